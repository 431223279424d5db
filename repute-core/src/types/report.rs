//! Aggregated reputation reports and their supporting enums.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::anomaly::Anomaly;
use super::factor::RiskFactor;

/// Risk level derived from an aggregate reputation score (higher score =
/// safer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
    Safe,
    /// No factors were available; absence of data never resolves to safe.
    Unknown,
}

impl RiskLevel {
    /// Classify a reputation score in [0, 100].
    ///
    /// A score of exactly 20 counts as critical; the remaining boundaries
    /// (40, 60, 80) belong to the level above them.
    pub fn from_score(score: f64) -> Self {
        if score <= 20.0 {
            Self::Critical
        } else if score < 40.0 {
            Self::High
        } else if score < 60.0 {
            Self::Medium
        } else if score < 80.0 {
            Self::Low
        } else {
            Self::Safe
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Safe => "safe",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Direction of recent score movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTrend {
    Stable,
    Improving,
    Declining,
    Volatile,
}

impl fmt::Display for ScoreTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stable => "stable",
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Volatile => "volatile",
        };
        write!(f, "{s}")
    }
}

/// Whether a factor pushed the aggregate score up or down from neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Positive,
    Negative,
}

/// One row of the explainability breakdown: a factor's share of the total
/// deviation from the neutral score. Proportional attribution, not causal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorImportance {
    pub name: String,
    /// Percentage share of total absolute deviation from neutral.
    pub contribution: f64,
    pub impact: Impact,
    pub weight: f64,
    pub raw_score: f64,
}

/// Complete output of factor aggregation for one subject.
///
/// Constructed fresh per invocation, immutable, owned exclusively by the
/// caller once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationReport {
    pub subject: String,
    /// Reputation score in [0, 100], higher = more trustworthy.
    pub overall_score: f64,
    pub risk_level: RiskLevel,
    /// Overall confidence in the score, in [0, 1].
    pub confidence: f64,
    /// (lower, upper) on the 0-100 scale.
    pub confidence_interval: (f64, f64),
    pub factors: Vec<RiskFactor>,
    pub anomalies: Vec<Anomaly>,
    /// Quality of the underlying data, in [0, 1].
    pub data_quality: f64,
    pub assessment_duration_ms: u64,
    pub trend: ScoreTrend,
    /// Latest factor observation time (unix seconds); 0 when no factors.
    pub assessed_at: u64,
}
