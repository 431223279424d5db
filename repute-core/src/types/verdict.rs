//! Fused ensemble verdicts.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::component::ComponentScore;

/// Strategy for combining component scores into one verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionStrategy {
    /// Per-component configured weights; the default.
    WeightedAverage,
    /// A single strong signal dominates (favors recall over precision).
    MaxVote,
    /// Temperature-scaled self-weighted average: up-weights higher scores
    /// as T approaches 0, approaches a plain mean as T grows.
    SoftVote,
}

impl fmt::Display for FusionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::WeightedAverage => "weighted_average",
            Self::MaxVote => "max_vote",
            Self::SoftVote => "soft_vote",
        };
        write!(f, "{s}")
    }
}

/// Attack technique inferred from component findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatTechnique {
    HomoglyphAttack,
    Typosquatting,
    CharacterManipulation,
    ComboSquatting,
    SubdomainAbuse,
    SuspiciousTld,
    CredentialPhishing,
    UrgencyManipulation,
}

impl fmt::Display for ThreatTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::HomoglyphAttack => "homoglyph_attack",
            Self::Typosquatting => "typosquatting",
            Self::CharacterManipulation => "character_manipulation",
            Self::ComboSquatting => "combo_squatting",
            Self::SubdomainAbuse => "subdomain_abuse",
            Self::SuspiciousTld => "suspicious_tld",
            Self::CredentialPhishing => "credential_phishing",
            Self::UrgencyManipulation => "urgency_manipulation",
        };
        write!(f, "{s}")
    }
}

/// Complete result of ensemble fusion for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionVerdict {
    pub is_threat: bool,
    /// Fused threat score in [0, 1], higher = more threatening.
    pub threat_score: f64,
    /// Mean component confidence scaled by agreement; detector disagreement
    /// suppresses confidence even when each detector is individually sure.
    pub confidence: f64,
    pub component_scores: Vec<ComponentScore>,
    /// `1 - stdev(scores)`; low agreement is surfaced in `explanation`.
    pub agreement_level: f64,
    /// Human-readable contributors (components scoring high, rules fired,
    /// content categories found).
    pub risk_factors: Vec<String>,
    pub detected_techniques: Vec<ThreatTechnique>,
    pub explanation: String,
    pub recommendations: Vec<String>,
    pub strategy: FusionStrategy,
    pub total_latency_ms: f64,
    pub components_used: Vec<String>,
}
