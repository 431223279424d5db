//! Multi-method anomaly detection for subject snapshots.

use repute_core::config::AnomalyConfig;
use repute_core::types::anomaly::{Anomaly, AnomalyEvidence, AnomalyKind, AnomalySeverity};
use repute_core::types::snapshot::SubjectSnapshot;

use super::baseline::BaselineTable;
use super::checks::{self, PatternCheck};
use crate::stats;

/// Detects statistical, temporal, pattern, and subject-specific anomalies.
///
/// Pure function of its inputs plus the baseline table; identical inputs
/// against an unchanged baseline produce identical results (anomalies are
/// stamped with the snapshot's observation time, never the wall clock).
#[derive(Debug)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
    baseline: BaselineTable,
    checks: Vec<PatternCheck>,
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self::with_config(AnomalyConfig::default())
    }

    pub fn with_config(config: AnomalyConfig) -> Self {
        Self {
            config,
            baseline: BaselineTable::new(),
            checks: checks::default_checks(),
        }
    }

    /// Register an additional pattern check.
    pub fn add_check(&mut self, check: PatternCheck) {
        self.checks.push(check);
    }

    /// The baseline table backing statistical outlier detection.
    pub fn baseline(&self) -> &BaselineTable {
        &self.baseline
    }

    /// Recompute the baseline for one feature. The only mutating operation
    /// in the core; takes the write lock, so concurrent detections briefly
    /// read the previous baseline.
    pub fn update_baseline(&self, feature: &str, values: &[f64]) {
        self.baseline.update(feature, values);
    }

    /// Detect anomalies in `current` against the baseline table and
    /// optional history. History may arrive unsorted; it is ordered by
    /// observation time internally.
    pub fn detect(&self, current: &SubjectSnapshot, historical: &[SubjectSnapshot]) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();
        self.detect_statistical_outliers(current, &mut anomalies);
        if historical.len() >= self.config.min_history {
            self.detect_temporal(current, historical, &mut anomalies);
        }
        self.detect_pattern_deviations(current, &mut anomalies);
        self.detect_subject_anomalies(current, &mut anomalies);
        anomalies
    }

    /// Z-score comparison of each tracked metric against its baseline.
    /// A feature is "tracked" exactly when the baseline table has an entry
    /// for it; baselines with zero spread are skipped.
    fn detect_statistical_outliers(&self, current: &SubjectSnapshot, out: &mut Vec<Anomaly>) {
        let mut names: Vec<&String> = current.metrics.keys().collect();
        names.sort();

        for name in names {
            let value = current.metrics[name];
            let Some(baseline) = self.baseline.get(name) else {
                continue;
            };
            if baseline.std <= 0.0 {
                continue;
            }
            let z = ((value - baseline.mean) / baseline.std).abs();
            if z > self.config.z_threshold {
                let severity = if z > self.config.severe_z {
                    AnomalySeverity::High
                } else {
                    AnomalySeverity::Medium
                };
                out.push(Anomaly {
                    kind: AnomalyKind::StatisticalOutlier,
                    severity,
                    score: (z * 20.0).min(100.0),
                    description: format!("{name} is {z:.1} standard deviations from the mean"),
                    features: vec![name.clone()],
                    evidence: AnomalyEvidence::ZScore {
                        value,
                        mean: baseline.mean,
                        z,
                    },
                    observed_at: current.observed_at,
                });
            }
        }
    }

    /// Sudden reputation-score shifts and categorical field changes against
    /// recent history.
    fn detect_temporal(
        &self,
        current: &SubjectSnapshot,
        historical: &[SubjectSnapshot],
        out: &mut Vec<Anomaly>,
    ) {
        let mut history: Vec<&SubjectSnapshot> = historical.iter().collect();
        history.sort_by_key(|s| s.observed_at);

        if let Some(current_score) = current.trust_score {
            let recent_start = history.len().saturating_sub(self.config.recent_window);
            let recent_scores: Vec<f64> = history[recent_start..]
                .iter()
                .map(|s| s.trust_score.unwrap_or(current_score))
                .collect();
            if !recent_scores.is_empty() {
                let previous_avg = stats::mean(&recent_scores);
                let change = (current_score - previous_avg).abs();
                if change > self.config.score_shift_threshold {
                    let severity = if change > self.config.severe_shift {
                        AnomalySeverity::Critical
                    } else {
                        AnomalySeverity::High
                    };
                    out.push(Anomaly {
                        kind: AnomalyKind::TemporalAnomaly,
                        severity,
                        score: (change * 2.0).min(100.0),
                        description: format!("Reputation score changed by {change:.1} points"),
                        features: vec!["trust_score".to_string()],
                        evidence: AnomalyEvidence::ScoreShift {
                            current: current_score,
                            previous_avg,
                            change,
                        },
                        observed_at: current.observed_at,
                    });
                }
            }
        }

        if let Some(current_registrar) = &current.registrar {
            let previous = history.iter().rev().find_map(|s| s.registrar.as_ref());
            if let Some(previous) = previous {
                if previous != current_registrar {
                    out.push(Anomaly {
                        kind: AnomalyKind::TemporalAnomaly,
                        severity: AnomalySeverity::High,
                        score: 75.0,
                        description: "Registrar has changed".to_string(),
                        features: vec!["registrar".to_string()],
                        evidence: AnomalyEvidence::FieldChange {
                            field: "registrar".to_string(),
                            current: current_registrar.clone(),
                            previous: previous.clone(),
                        },
                        observed_at: current.observed_at,
                    });
                }
            }
        }
    }

    fn detect_pattern_deviations(&self, current: &SubjectSnapshot, out: &mut Vec<Anomaly>) {
        for check in &self.checks {
            if (check.predicate)(current) {
                out.push(Anomaly {
                    kind: AnomalyKind::PatternDeviation,
                    severity: check.severity,
                    score: check.severity.pattern_score(),
                    description: check.description.to_string(),
                    features: vec![check.feature.to_string()],
                    evidence: AnomalyEvidence::PatternCheck {
                        check: check.name.to_string(),
                    },
                    observed_at: current.observed_at,
                });
            }
        }
    }

    /// Checks specific to the subject artifact itself: high-risk TLD
    /// membership, subdomain nesting depth, and similarity to a protected
    /// entity.
    fn detect_subject_anomalies(&self, current: &SubjectSnapshot, out: &mut Vec<Anomaly>) {
        let subject = current.subject.to_lowercase();
        for tld in &self.config.high_risk_tlds {
            if subject.ends_with(&format!(".{tld}")) {
                out.push(Anomaly {
                    kind: AnomalyKind::ClusterAnomaly,
                    severity: AnomalySeverity::Low,
                    score: 30.0,
                    description: format!("Subject uses high-risk TLD: .{tld}"),
                    features: vec!["tld".to_string()],
                    evidence: AnomalyEvidence::HighRiskTld { tld: tld.clone() },
                    observed_at: current.observed_at,
                });
            }
        }

        let depth = current.label_depth();
        if depth > self.config.max_label_depth {
            out.push(Anomaly {
                kind: AnomalyKind::ClusterAnomaly,
                severity: AnomalySeverity::Medium,
                score: 40.0,
                description: "Excessive subdomain nesting".to_string(),
                features: vec!["subdomain_structure".to_string()],
                evidence: AnomalyEvidence::LabelDepth { depth },
                observed_at: current.observed_at,
            });
        }

        if let Some(affinity) = &current.brand_affinity {
            if affinity.similarity > self.config.impersonation_threshold {
                out.push(Anomaly {
                    kind: AnomalyKind::BehavioralChange,
                    severity: AnomalySeverity::Critical,
                    score: 90.0,
                    description: "High similarity to a protected brand, possible impersonation"
                        .to_string(),
                    features: vec!["brand_similarity".to_string()],
                    evidence: AnomalyEvidence::BrandAffinity {
                        similarity: affinity.similarity,
                        brand: affinity.brand.clone(),
                    },
                    observed_at: current.observed_at,
                });
            }
        }
    }

    /// Aggregate a set of anomalies into one 0-100 score: severity-weighted
    /// sum with a dampening factor, so multiple anomalies raise the score
    /// with diminishing marginal contribution. Empty input scores 0.
    pub fn aggregate_score(&self, anomalies: &[Anomaly]) -> f64 {
        if anomalies.is_empty() {
            return 0.0;
        }
        let weighted: f64 = anomalies
            .iter()
            .map(|a| a.score * a.severity.weight())
            .sum();
        let dampening = 1.0 + self.config.dampening_step * (anomalies.len() - 1) as f64;
        (weighted / dampening).min(100.0)
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}
