//! Detected deviations from statistical or behavioral baselines.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collections::FxHashMap;

/// Family of detection that produced an anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    StatisticalOutlier,
    TemporalAnomaly,
    PatternDeviation,
    ClusterAnomaly,
    BehavioralChange,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::StatisticalOutlier => "statistical_outlier",
            Self::TemporalAnomaly => "temporal_anomaly",
            Self::PatternDeviation => "pattern_deviation",
            Self::ClusterAnomaly => "cluster_anomaly",
            Self::BehavioralChange => "behavioral_change",
        };
        write!(f, "{s}")
    }
}

/// Anomaly severity. Closed: the weight and score tables below match
/// exhaustively, so a new severity cannot be added without updating every
/// consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl AnomalySeverity {
    /// Weight applied when aggregating multiple anomalies into one score.
    pub fn weight(self) -> f64 {
        match self {
            Self::Critical => 1.0,
            Self::High => 0.7,
            Self::Medium => 0.4,
            Self::Low => 0.1,
        }
    }

    /// Fixed anomaly score assigned to table-driven pattern checks.
    pub fn pattern_score(self) -> f64 {
        match self {
            Self::Critical => 100.0,
            Self::High => 75.0,
            Self::Medium => 50.0,
            Self::Low => 25.0,
        }
    }

    /// Points subtracted from a reputation score per anomaly of this
    /// severity (before the aggregate penalty cap).
    pub fn penalty(self) -> f64 {
        match self {
            Self::Critical => 30.0,
            Self::High => 20.0,
            Self::Medium => 10.0,
            Self::Low => 5.0,
        }
    }
}

impl fmt::Display for AnomalySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        write!(f, "{s}")
    }
}

/// Typed evidence attached to an anomaly, one variant per detection family.
/// `Free` is the escape hatch for genuinely free-form diagnostics only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyEvidence {
    ZScore {
        value: f64,
        mean: f64,
        z: f64,
    },
    ScoreShift {
        current: f64,
        previous_avg: f64,
        change: f64,
    },
    FieldChange {
        field: String,
        current: String,
        previous: String,
    },
    PatternCheck {
        check: String,
    },
    HighRiskTld {
        tld: String,
    },
    LabelDepth {
        depth: usize,
    },
    BrandAffinity {
        similarity: f64,
        brand: Option<String>,
    },
    Free(FxHashMap<String, serde_json::Value>),
}

/// One detected deviation. Created per detection call, never mutated,
/// consumed immediately by the caller; the core does not persist anomalies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub severity: AnomalySeverity,
    /// Magnitude of deviation in [0, 100]; higher = more anomalous.
    pub score: f64,
    pub description: String,
    /// Feature names implicated in the deviation.
    pub features: Vec<String>,
    pub evidence: AnomalyEvidence,
    /// Taken from the snapshot under analysis, never from the wall clock,
    /// so identical inputs yield identical anomalies.
    pub observed_at: u64,
}
