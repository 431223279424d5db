//! Subject snapshots: the typed observation record consumed by anomaly
//! detection, and the per-feature baseline statistics they are compared to.

use serde::{Deserialize, Serialize};

use crate::collections::FxHashMap;

/// Similarity of the subject to a protected entity (brand, person, org),
/// as reported by an external similarity detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandAffinityObservation {
    /// Similarity in [0, 1].
    pub similarity: f64,
    /// The entity the subject resembles, when known.
    pub brand: Option<String>,
}

/// One observation of a subject (domain, handle, or content item).
///
/// Numeric features live in `metrics`, keyed by feature name so they join
/// against the baseline table (`domain_age_days`, `ssl_validity_days`,
/// `dns_ttl`, `mx_count`, `txt_count`, `cname_count`, `ssl_age_days`, ...).
/// Fields with fixed, non-numeric shapes are typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectSnapshot {
    pub subject: String,
    /// Unix seconds at observation time. Orders history and stamps any
    /// anomalies derived from this snapshot.
    pub observed_at: u64,
    /// Reputation score (0-100) at observation time, when one was computed.
    pub trust_score: Option<f64>,
    pub registrar: Option<String>,
    pub has_website: bool,
    pub wildcard_dns: bool,
    pub brand_affinity: Option<BrandAffinityObservation>,
    pub metrics: FxHashMap<String, f64>,
}

impl SubjectSnapshot {
    pub fn new(subject: impl Into<String>, observed_at: u64) -> Self {
        Self {
            subject: subject.into(),
            observed_at,
            ..Self::default()
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    /// Number of dot-separated labels below the registrable name; a proxy
    /// for subdomain nesting depth.
    pub fn label_depth(&self) -> usize {
        self.subject.matches('.').count()
    }
}

/// Per-feature baseline statistics maintained by the anomaly engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineStats {
    pub mean: f64,
    /// Sample standard deviation.
    pub std: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_depth_counts_dots() {
        assert_eq!(SubjectSnapshot::new("example.com", 0).label_depth(), 1);
        assert_eq!(
            SubjectSnapshot::new("a.b.c.example.com", 0).label_depth(),
            4
        );
    }
}
