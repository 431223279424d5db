//! Scores produced by independent ensemble component detectors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::FusionError;

/// Role a component plays in the ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    /// Semantic similarity (embedding-based).
    Semantic,
    /// Character/structure analysis.
    Syntactic,
    /// Content classification.
    Classifier,
    /// Pair-wise scoring.
    CrossEncoder,
    /// Score fusion over other components.
    MetaLearner,
}

impl fmt::Display for ComponentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Semantic => "semantic",
            Self::Syntactic => "syntactic",
            Self::Classifier => "classifier",
            Self::CrossEncoder => "cross_encoder",
            Self::MetaLearner => "meta_learner",
        };
        write!(f, "{s}")
    }
}

/// Typed findings reported by a component, used for technique
/// identification in the fused verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentFindings {
    /// Per-signal scores from character-level analysis, each in [0, 1].
    CharacterAnalysis {
        visual_confusion: f64,
        keyboard_proximity: f64,
        edit_distance: f64,
    },
    /// Names of heuristic rules that fired.
    HeuristicRules { rules_triggered: Vec<String> },
    /// Content categories detected by a classifier.
    ContentClassification { categories: Vec<String> },
    #[default]
    None,
}

/// Opaque detector output consumed by the ensemble. `score` uses the threat
/// polarity (0 = benign, 1 = certain threat).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub component_name: String,
    pub role: ComponentRole,
    /// Threat score in [0, 1].
    pub score: f64,
    /// Component's own confidence in its score, in [0, 1].
    pub confidence: f64,
    pub latency_ms: f64,
    pub features_used: Vec<String>,
    #[serde(default)]
    pub findings: ComponentFindings,
}

impl ComponentScore {
    /// Build a validated component score.
    pub fn new(
        component_name: impl Into<String>,
        role: ComponentRole,
        score: f64,
        confidence: f64,
    ) -> Result<Self, FusionError> {
        let cs = Self {
            component_name: component_name.into(),
            role,
            score,
            confidence,
            latency_ms: 0.0,
            features_used: Vec::new(),
            findings: ComponentFindings::None,
        };
        cs.validate()?;
        Ok(cs)
    }

    /// Re-check the range invariants at an engine boundary.
    pub fn validate(&self) -> Result<(), FusionError> {
        FusionError::check_range("component score", self.score, 0.0, 1.0)?;
        FusionError::check_range("component confidence", self.confidence, 0.0, 1.0)?;
        Ok(())
    }

    pub fn with_latency_ms(mut self, latency_ms: f64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_findings(mut self, findings: ComponentFindings) -> Self {
        self.findings = findings;
        self
    }

    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features_used = features;
        self
    }
}
