//! Per-component configuration.
//!
//! The empirically-chosen constants (dampening step, corroboration bonus,
//! thresholds) are tunables with the production defaults, not fixed law.

use serde::{Deserialize, Serialize};

use crate::collections::FxHashMap;
use crate::types::verdict::FusionStrategy;

/// Configuration for the confidence calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Default coverage level for intervals (default: 0.95).
    pub default_level: f64,
    /// Corroboration bonus added per independent signal when aggregating
    /// confidences (default: 0.02).
    pub corroboration_step: f64,
    /// Cap on the corroboration bonus (default: 0.2).
    pub corroboration_cap: f64,
    /// Floor applied to individual confidences before the geometric mean,
    /// keeping `ln` finite (default: 0.001).
    pub confidence_floor: f64,
    /// Minimum sample size when the factor count stands in for n
    /// (default: 10).
    pub min_sample_size: u64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            default_level: 0.95,
            corroboration_step: 0.02,
            corroboration_cap: 0.2,
            confidence_floor: 0.001,
            min_sample_size: 10,
        }
    }
}

/// Configuration for anomaly detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Z-score threshold for statistical outliers (default: 2.5).
    pub z_threshold: f64,
    /// Z-score above which an outlier is high rather than medium severity
    /// (default: 3.5).
    pub severe_z: f64,
    /// Reputation-score shift that triggers a temporal anomaly
    /// (default: 20.0).
    pub score_shift_threshold: f64,
    /// Shift above which the temporal anomaly is critical rather than high
    /// (default: 40.0).
    pub severe_shift: f64,
    /// How many recent history points the shift is measured against
    /// (default: 5).
    pub recent_window: usize,
    /// Minimum history length for temporal detection (default: 3).
    pub min_history: usize,
    /// Dampening step per additional anomaly when aggregating
    /// (default: 0.1).
    pub dampening_step: f64,
    /// TLDs treated as high-risk category membership.
    #[serde(default)]
    pub high_risk_tlds: Vec<String>,
    /// Label depth above which subdomain nesting is flagged (default: 3).
    pub max_label_depth: usize,
    /// Brand similarity above which impersonation is flagged
    /// (default: 0.8).
    pub impersonation_threshold: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            z_threshold: 2.5,
            severe_z: 3.5,
            score_shift_threshold: 20.0,
            severe_shift: 40.0,
            recent_window: 5,
            min_history: 3,
            dampening_step: 0.1,
            high_risk_tlds: ["tk", "ml", "ga", "cf", "gq", "top", "xyz"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_label_depth: 3,
            impersonation_threshold: 0.8,
        }
    }
}

/// Configuration for factor aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Cap on total anomaly penalty points (default: 50.0).
    pub penalty_cap: f64,
    /// Score returned when no signal is available (default: 50.0).
    pub neutral_score: f64,
    /// Confidence reported for the no-data result (default: 0.1).
    pub no_data_confidence: f64,
    /// Factor-score standard deviation above which the trend is volatile
    /// (default: 20.0).
    pub volatile_std: f64,
    /// Standard deviation above which the trend is improving/declining
    /// rather than stable (default: 10.0).
    pub trending_std: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            penalty_cap: 50.0,
            neutral_score: 50.0,
            no_data_confidence: 0.1,
            volatile_std: 20.0,
            trending_std: 10.0,
        }
    }
}

/// Configuration for the ensemble fusion engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Combination strategy (default: weighted average).
    pub strategy: FusionStrategy,
    /// Soft-vote temperature (default: 1.0).
    pub temperature: f64,
    /// Fused score at or above which the verdict is a threat
    /// (default: 0.65).
    pub threat_threshold: f64,
    /// Fused score above which the critical recommendation tier applies
    /// (default: 0.85).
    pub high_confidence_threshold: f64,
    /// Agreement level below which disagreement is called out in the
    /// explanation (default: 0.5).
    pub disagreement_threshold: f64,
    /// Per-component weights for the weighted-average strategy; a missing
    /// entry defaults to 1.0.
    #[serde(default)]
    pub weights: FxHashMap<String, f64>,
    /// Verdict cache capacity in entries (default: 10_000).
    pub cache_capacity: u64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            strategy: FusionStrategy::WeightedAverage,
            temperature: 1.0,
            threat_threshold: 0.65,
            high_confidence_threshold: 0.85,
            disagreement_threshold: 0.5,
            weights: FxHashMap::default(),
            cache_capacity: 10_000,
        }
    }
}
