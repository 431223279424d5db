//! Risk factors: weighted, confidence-tagged signals from external detectors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collections::FxHashMap;
use crate::errors::FusionError;

/// Severity attached to a single risk factor by its producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    Critical,
    High,
    Medium,
    Low,
    Info,
    None,
}

impl fmt::Display for RiskSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Info => "info",
            Self::None => "none",
        };
        write!(f, "{s}")
    }
}

/// One weighted risk signal contributing to an overall reputation score.
///
/// A value object: constructed once by a feature extractor or classifier,
/// never mutated afterwards. `score` uses the reputation polarity
/// (0 = malicious, 100 = trustworthy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Unique within a single scoring call.
    pub name: String,
    /// Reputation score in [0, 100].
    pub score: f64,
    /// Relative importance in [0, 1], before normalization.
    pub weight: f64,
    pub severity: RiskSeverity,
    /// How much to trust this factor's score, in [0, 1].
    pub confidence: f64,
    pub description: String,
    /// Producing subsystem (e.g. "threat_intel", "dns_configuration").
    pub source: String,
    /// Free-form diagnostic context. Anything with a fixed shape belongs in
    /// a typed field instead.
    #[serde(default)]
    pub metadata: FxHashMap<String, serde_json::Value>,
    /// Unix seconds at observation time.
    pub observed_at: u64,
}

impl RiskFactor {
    /// Build a validated factor. Fails fast on out-of-range score, weight,
    /// or confidence.
    pub fn new(
        name: impl Into<String>,
        score: f64,
        weight: f64,
        severity: RiskSeverity,
        confidence: f64,
        source: impl Into<String>,
    ) -> Result<Self, FusionError> {
        let factor = Self {
            name: name.into(),
            score,
            weight,
            severity,
            confidence,
            description: String::new(),
            source: source.into(),
            metadata: FxHashMap::default(),
            observed_at: 0,
        };
        factor.validate()?;
        Ok(factor)
    }

    /// Re-check the range invariants. Engines call this at their boundary
    /// since fields are public.
    pub fn validate(&self) -> Result<(), FusionError> {
        FusionError::check_range("factor score", self.score, 0.0, 100.0)?;
        FusionError::check_range("factor weight", self.weight, 0.0, 1.0)?;
        FusionError::check_range("factor confidence", self.confidence, 0.0, 1.0)?;
        Ok(())
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_observed_at(mut self, observed_at: u64) -> Self {
        self.observed_at = observed_at;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Contribution of this factor: `score * weight * confidence`.
    pub fn weighted_score(&self) -> f64 {
        self.score * self.weight * self.confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_score_is_product() {
        let f = RiskFactor::new("domain_age", 80.0, 0.2, RiskSeverity::Low, 0.9, "whois").unwrap();
        assert!((f.weighted_score() - 80.0 * 0.2 * 0.9).abs() < 1e-12);
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(RiskFactor::new("x", 101.0, 0.2, RiskSeverity::Low, 0.9, "s").is_err());
        assert!(RiskFactor::new("x", 50.0, 1.2, RiskSeverity::Low, 0.9, "s").is_err());
        assert!(RiskFactor::new("x", 50.0, 0.2, RiskSeverity::Low, -0.1, "s").is_err());
        assert!(RiskFactor::new("x", f64::NAN, 0.2, RiskSeverity::Low, 0.9, "s").is_err());
    }
}
