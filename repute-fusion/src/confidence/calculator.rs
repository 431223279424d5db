//! Confidence intervals for proportions, plus confidence/uncertainty
//! aggregation over heterogeneous signals.
//!
//! Wilson is the default interval: it stays within [0, 1] and is
//! well-behaved for small n or extreme p, both common when the sample size
//! is a handful of risk factors.

use statrs::distribution::{Beta, ContinuousCDF, Normal};

use repute_core::config::ConfidenceConfig;
use repute_core::errors::FusionError;
use repute_core::types::confidence::{ConfidenceResult, IntervalMethod};

/// Fixed z-values for the common coverage levels. Other levels go through
/// the normal quantile function.
const Z_TABLE: [(f64, f64); 3] = [(0.90, 1.645), (0.95, 1.96), (0.99, 2.576)];

/// Calculates confidence intervals and aggregates confidence/uncertainty.
/// Stateless apart from its configuration; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceCalculator {
    config: ConfidenceConfig,
}

impl ConfidenceCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConfidenceConfig) -> Self {
        Self { config }
    }

    /// Interval for `successes / trials` at the configured default level.
    pub fn calculate(
        &self,
        successes: u64,
        trials: u64,
        method: IntervalMethod,
    ) -> Result<ConfidenceResult, FusionError> {
        self.calculate_at_level(successes, trials, method, self.config.default_level)
    }

    /// Interval for `successes / trials` at an explicit coverage level.
    ///
    /// Zero trials is not an error: it returns the maximally uncertain
    /// interval `[0, 1]` centered at 0.5, the designed default for
    /// "no data".
    pub fn calculate_at_level(
        &self,
        successes: u64,
        trials: u64,
        method: IntervalMethod,
        level: f64,
    ) -> Result<ConfidenceResult, FusionError> {
        if !(level > 0.0 && level < 1.0) {
            return Err(FusionError::InvalidConfidenceLevel { level });
        }
        if successes > trials {
            return Err(FusionError::InvalidProportion { successes, trials });
        }
        if trials == 0 {
            return Ok(ConfidenceResult {
                point_estimate: 0.5,
                lower_bound: 0.0,
                upper_bound: 1.0,
                confidence_level: level,
                method,
                sample_size: 0,
                standard_error: None,
                margin_of_error: None,
            });
        }

        let p = successes as f64 / trials as f64;
        match method {
            IntervalMethod::Wilson | IntervalMethod::Bootstrap => {
                Ok(self.wilson_result(p, trials, level))
            }
            IntervalMethod::ClopperPearson => Ok(self.clopper_pearson(successes, trials, level)),
            IntervalMethod::Normal => Ok(self.normal_approximation(p, trials, level)),
            IntervalMethod::Bayesian => Ok(self.jeffreys(successes, trials, level)),
        }
    }

    /// Wilson score bounds for a raw proportion. Exposed within the crate so
    /// the factor aggregator can use an exact (non-integer) proportion.
    pub(crate) fn wilson_bounds(&self, p: f64, n: u64, level: f64) -> (f64, f64) {
        let z = z_value(level);
        let nf = n as f64;
        let denom = 1.0 + z * z / nf;
        let center = p + z * z / (2.0 * nf);
        let adj_sd = ((p * (1.0 - p) + z * z / (4.0 * nf)) / nf).sqrt();
        let lower = ((center - z * adj_sd) / denom).max(0.0);
        let upper = ((center + z * adj_sd) / denom).min(1.0);
        (lower, upper)
    }

    fn wilson_result(&self, p: f64, n: u64, level: f64) -> ConfidenceResult {
        let (lower, upper) = self.wilson_bounds(p, n, level);
        let se = standard_error(p, n);
        ConfidenceResult {
            point_estimate: p,
            lower_bound: lower,
            upper_bound: upper,
            confidence_level: level,
            method: IntervalMethod::Wilson,
            sample_size: n,
            standard_error: se,
            margin_of_error: se.map(|s| z_value(level) * s),
        }
    }

    /// Clopper-Pearson exact interval from Beta quantiles. Conservative:
    /// guarantees coverage at the cost of interval width.
    fn clopper_pearson(&self, successes: u64, trials: u64, level: f64) -> ConfidenceResult {
        let alpha = 1.0 - level;
        let p = successes as f64 / trials as f64;
        let failures = trials - successes;

        let lower = if successes == 0 {
            Some(0.0)
        } else {
            beta_quantile(alpha / 2.0, successes as f64, failures as f64 + 1.0)
        };
        let upper = if successes == trials {
            Some(1.0)
        } else {
            beta_quantile(1.0 - alpha / 2.0, successes as f64 + 1.0, failures as f64)
        };

        let (Some(lower), Some(upper)) = (lower, upper) else {
            // Degenerate beta parameters; Wilson is always defined.
            tracing::warn!(successes, trials, "beta quantile degenerate, using wilson");
            return self.wilson_result(p, trials, level);
        };

        let se = standard_error(p, trials);
        ConfidenceResult {
            point_estimate: p,
            // Quantile corner cases must not break the ordering invariant.
            lower_bound: lower.min(p).max(0.0),
            upper_bound: upper.max(p).min(1.0),
            confidence_level: level,
            method: IntervalMethod::ClopperPearson,
            sample_size: trials,
            standard_error: se,
            margin_of_error: se.map(|s| z_value(level) * s),
        }
    }

    fn normal_approximation(&self, p: f64, n: u64, level: f64) -> ConfidenceResult {
        let z = z_value(level);
        let se = (p * (1.0 - p) / n as f64).sqrt();
        let moe = z * se;
        ConfidenceResult {
            point_estimate: p,
            lower_bound: (p - moe).max(0.0),
            upper_bound: (p + moe).min(1.0),
            confidence_level: level,
            method: IntervalMethod::Normal,
            sample_size: n,
            standard_error: standard_error(p, n),
            margin_of_error: standard_error(p, n).map(|s| z * s),
        }
    }

    /// Jeffreys-prior credible interval: Beta(s + 1/2, f + 1/2) quantiles,
    /// with the standard boundary modification at s = 0 and s = n.
    fn jeffreys(&self, successes: u64, trials: u64, level: f64) -> ConfidenceResult {
        let alpha = 1.0 - level;
        let p = successes as f64 / trials as f64;
        let a = successes as f64 + 0.5;
        let b = (trials - successes) as f64 + 0.5;

        let lower = if successes == 0 {
            Some(0.0)
        } else {
            beta_quantile(alpha / 2.0, a, b)
        };
        let upper = if successes == trials {
            Some(1.0)
        } else {
            beta_quantile(1.0 - alpha / 2.0, a, b)
        };

        let (Some(lower), Some(upper)) = (lower, upper) else {
            tracing::warn!(successes, trials, "beta quantile degenerate, using wilson");
            return self.wilson_result(p, trials, level);
        };

        let se = standard_error(p, trials);
        ConfidenceResult {
            point_estimate: p,
            lower_bound: lower.min(p).max(0.0),
            upper_bound: upper.max(p).min(1.0),
            confidence_level: level,
            method: IntervalMethod::Bayesian,
            sample_size: trials,
            standard_error: se,
            margin_of_error: se.map(|s| z_value(level) * s),
        }
    }

    /// Interval for a reputation score (0-100), using the factor count as a
    /// sample-size proxy (floored at the configured minimum). Returns
    /// (lower, upper) on the 0-100 scale.
    pub fn interval_for_reputation(
        &self,
        score: f64,
        factor_count: usize,
    ) -> Result<(f64, f64), FusionError> {
        FusionError::check_range("reputation score", score, 0.0, 100.0)?;
        let n = (factor_count as u64).max(self.config.min_sample_size);
        let p = score / 100.0;
        // Truncation, not rounding: a 95.0 score over n=10 counts 9
        // successes.
        let successes = (p * n as f64).floor() as u64;
        let result = self.calculate(successes, n, IntervalMethod::Wilson)?;
        Ok((result.lower_bound * 100.0, result.upper_bound * 100.0))
    }

    /// Weighted geometric mean of individual confidences, plus a small
    /// corroboration bonus for additional independent signals.
    ///
    /// Geometric rather than arithmetic: a single near-zero confidence drags
    /// the aggregate down sharply, penalizing weak links. Weights of the
    /// wrong length fall back to uniform.
    pub fn aggregate_confidence(
        &self,
        confidences: &[f64],
        weights: Option<&[f64]>,
    ) -> Result<f64, FusionError> {
        for &c in confidences {
            FusionError::check_range("confidence", c, 0.0, 1.0)?;
        }
        if confidences.is_empty() {
            return Ok(0.0);
        }

        let uniform = vec![1.0; confidences.len()];
        let weights = match weights {
            Some(w) if w.len() == confidences.len() => w,
            _ => uniform.as_slice(),
        };

        let total_weight: f64 = weights.iter().sum();
        if total_weight == 0.0 {
            return Ok(0.0);
        }

        let log_sum: f64 = confidences
            .iter()
            .zip(weights)
            .map(|(&c, &w)| c.max(self.config.confidence_floor).ln() * w)
            .sum();
        let geo_mean = (log_sum / total_weight).exp();

        let bonus = (self.config.corroboration_step * confidences.len() as f64)
            .min(self.config.corroboration_cap);
        Ok((geo_mean + bonus).min(1.0))
    }

    /// Overall uncertainty in [0, 1] from four independent terms: data
    /// quality, source reliability, sample size (diminishing past ~30), and
    /// staleness (saturating at one week).
    pub fn calculate_uncertainty(
        &self,
        data_quality: f64,
        source_reliability: f64,
        sample_size: u64,
        hours_since_update: f64,
    ) -> Result<f64, FusionError> {
        FusionError::check_range("data_quality", data_quality, 0.0, 1.0)?;
        FusionError::check_range("source_reliability", source_reliability, 0.0, 1.0)?;
        FusionError::check_range("hours_since_update", hours_since_update, 0.0, f64::MAX)?;

        let quality = 1.0 - data_quality;
        let reliability = 1.0 - source_reliability;
        let sample = 1.0 / (sample_size.max(1) as f64).sqrt();
        let staleness = (hours_since_update / 168.0).min(1.0);

        let uncertainty =
            0.30 * quality + 0.25 * reliability + 0.25 * sample + 0.20 * staleness;
        Ok(uncertainty.min(1.0))
    }
}

/// z-value for a coverage level: table lookup for the common levels, normal
/// quantile otherwise.
fn z_value(level: f64) -> f64 {
    for (l, z) in Z_TABLE {
        if (level - l).abs() < 1e-9 {
            return z;
        }
    }
    match Normal::new(0.0, 1.0) {
        Ok(standard) => standard.inverse_cdf(1.0 - (1.0 - level) / 2.0),
        Err(_) => 1.96,
    }
}

/// Standard error of a proportion; undefined at the exact 0/1 boundary.
fn standard_error(p: f64, n: u64) -> Option<f64> {
    if n > 0 && p > 0.0 && p < 1.0 {
        Some((p * (1.0 - p) / n as f64).sqrt())
    } else {
        None
    }
}

/// Beta quantile guarded against invalid parameters; statrs inverse_cdf
/// misbehaves on degenerate shapes, so those return None for the caller to
/// handle.
fn beta_quantile(p: f64, shape_a: f64, shape_b: f64) -> Option<f64> {
    if !shape_a.is_finite() || !shape_b.is_finite() || shape_a <= 0.0 || shape_b <= 0.0 {
        return None;
    }
    let dist = Beta::new(shape_a, shape_b).ok()?;
    let q = dist.inverse_cdf(p);
    q.is_finite().then_some(q.clamp(0.0, 1.0))
}
