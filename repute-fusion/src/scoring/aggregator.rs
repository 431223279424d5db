//! Combines weighted, confidence-tagged risk factors and detected anomalies
//! into one reputation score with a calibrated interval.

use repute_core::config::{ConfidenceConfig, ScoringConfig};
use repute_core::errors::FusionError;
use repute_core::types::anomaly::Anomaly;
use repute_core::types::factor::RiskFactor;
use repute_core::types::report::{
    FactorImportance, Impact, ReputationReport, RiskLevel, ScoreTrend,
};

use crate::confidence::ConfidenceCalculator;
use crate::stats;

/// Scoring model over risk factors. Stateless apart from configuration.
#[derive(Debug, Default)]
pub struct FactorAggregator {
    config: ScoringConfig,
    confidence: ConfidenceCalculator,
}

impl FactorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig, confidence: ConfidenceConfig) -> Self {
        Self {
            config,
            confidence: ConfidenceCalculator::with_config(confidence),
        }
    }

    /// Score a subject from its risk factors and detected anomalies.
    ///
    /// An empty factor list yields the neutral score with `Unknown` risk and
    /// minimal confidence; absence of data never resolves to "safe".
    pub fn score(
        &self,
        subject: &str,
        factors: &[RiskFactor],
        anomalies: &[Anomaly],
        data_quality: f64,
        duration_ms: u64,
    ) -> Result<ReputationReport, FusionError> {
        FusionError::check_range("data_quality", data_quality, 0.0, 1.0)?;
        for factor in factors {
            factor.validate()?;
        }

        if factors.is_empty() {
            return Ok(ReputationReport {
                subject: subject.to_string(),
                overall_score: self.config.neutral_score,
                risk_level: RiskLevel::Unknown,
                confidence: self.config.no_data_confidence,
                confidence_interval: (0.0, 100.0),
                factors: Vec::new(),
                anomalies: anomalies.to_vec(),
                data_quality,
                assessment_duration_ms: duration_ms,
                trend: ScoreTrend::Stable,
                assessed_at: 0,
            });
        }

        let base_score = self.base_score(factors);
        let penalty = self.threat_penalty(anomalies);
        let adjusted = (base_score - penalty).max(0.0);

        let confidence = self.overall_confidence(factors, data_quality);
        let interval = self.confidence_interval(adjusted, confidence, factors.len())?;

        Ok(ReputationReport {
            subject: subject.to_string(),
            overall_score: adjusted,
            risk_level: RiskLevel::from_score(adjusted),
            confidence,
            confidence_interval: interval,
            factors: factors.to_vec(),
            anomalies: anomalies.to_vec(),
            data_quality,
            assessment_duration_ms: duration_ms,
            trend: self.trend(factors),
            assessed_at: factors.iter().map(|f| f.observed_at).max().unwrap_or(0),
        })
    }

    /// Confidence-weighted weighted average of factor scores.
    fn base_score(&self, factors: &[RiskFactor]) -> f64 {
        let total_weighted: f64 = factors.iter().map(RiskFactor::weighted_score).sum();
        let total_weight: f64 = factors.iter().map(|f| f.weight * f.confidence).sum();
        if total_weight > 0.0 {
            total_weighted / total_weight
        } else {
            tracing::warn!("zero effective factor weight, using neutral score");
            self.config.neutral_score
        }
    }

    /// Points subtracted for detected anomalies, capped so a pile of minor
    /// anomalies cannot zero out a strong reputation on its own.
    fn threat_penalty(&self, anomalies: &[Anomaly]) -> f64 {
        let penalty: f64 = anomalies.iter().map(|a| a.severity.penalty()).sum();
        penalty.min(self.config.penalty_cap)
    }

    /// Weight-weighted mean factor confidence, scaled by data quality.
    fn overall_confidence(&self, factors: &[RiskFactor], data_quality: f64) -> f64 {
        let total_confidence: f64 = factors.iter().map(|f| f.confidence * f.weight).sum();
        let total_weight: f64 = factors.iter().map(|f| f.weight).sum();
        let avg = if total_weight > 0.0 {
            total_confidence / total_weight
        } else {
            0.5
        };
        (avg * (0.5 + 0.5 * data_quality)).min(1.0)
    }

    /// Wilson interval over the score, then widened (or narrowed) around its
    /// midpoint by `1.5 - confidence`: low confidence yields a wider, less
    /// committal interval.
    fn confidence_interval(
        &self,
        score: f64,
        confidence: f64,
        factor_count: usize,
    ) -> Result<(f64, f64), FusionError> {
        let (lower, upper) = self
            .confidence
            .interval_for_reputation(score, factor_count)?;
        let width = (upper - lower) * (1.5 - confidence);
        let center = (upper + lower) / 2.0;
        Ok((
            (center - width / 2.0).max(0.0),
            (center + width / 2.0).min(100.0),
        ))
    }

    /// Factor-score volatility as a trend proxy: high spread is volatile,
    /// moderate spread trends in the direction of the latest factor.
    fn trend(&self, factors: &[RiskFactor]) -> ScoreTrend {
        if factors.len() < 2 {
            return ScoreTrend::Stable;
        }
        let scores: Vec<f64> = factors.iter().map(|f| f.score).collect();
        let std = stats::population_std(&scores);
        if std > self.config.volatile_std {
            ScoreTrend::Volatile
        } else if std > self.config.trending_std {
            if scores[scores.len() - 1] < scores[0] {
                ScoreTrend::Declining
            } else {
                ScoreTrend::Improving
            }
        } else {
            ScoreTrend::Stable
        }
    }

    /// Per-factor share of the total deviation from the neutral score,
    /// ranked most-influential first. Proportional attribution for
    /// explainability, not a causal claim.
    pub fn feature_importance(&self, factors: &[RiskFactor]) -> Vec<FactorImportance> {
        let neutral = self.config.neutral_score;
        let total: f64 = factors
            .iter()
            .map(|f| (f.weighted_score() - neutral).abs())
            .sum();

        let mut rows: Vec<FactorImportance> = factors
            .iter()
            .map(|f| {
                let deviation = (f.weighted_score() - neutral).abs();
                FactorImportance {
                    name: f.name.clone(),
                    contribution: if total > 0.0 {
                        deviation / total * 100.0
                    } else {
                        0.0
                    },
                    impact: if f.score > neutral {
                        Impact::Positive
                    } else {
                        Impact::Negative
                    },
                    weight: f.weight,
                    raw_score: f.score,
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            b.contribution
                .partial_cmp(&a.contribution)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }
}
