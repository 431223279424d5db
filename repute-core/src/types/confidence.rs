//! Confidence-interval results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Statistical method used to compute an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalMethod {
    /// Wilson score interval. Stays within [0, 1] and behaves well for
    /// small samples and extreme proportions; the default.
    Wilson,
    /// Clopper-Pearson exact interval. Conservative; guarantees coverage at
    /// the cost of width.
    ClopperPearson,
    /// Normal approximation. Simplest, least accurate for small n; kept for
    /// comparison.
    Normal,
    /// Requires resampling, which this deterministic core does not do;
    /// computed as Wilson.
    Bootstrap,
    /// Jeffreys-prior Beta credible interval.
    Bayesian,
}

impl fmt::Display for IntervalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Wilson => "wilson",
            Self::ClopperPearson => "clopper_pearson",
            Self::Normal => "normal",
            Self::Bootstrap => "bootstrap",
            Self::Bayesian => "bayesian",
        };
        write!(f, "{s}")
    }
}

/// Output of interval estimation over a proportion.
///
/// Invariant: `lower_bound <= point_estimate <= upper_bound`, with both
/// bounds clamped to [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// The requested coverage level, in (0, 1).
    pub confidence_level: f64,
    pub method: IntervalMethod,
    pub sample_size: u64,
    /// None when undefined (zero trials, or p at an exact 0/1 boundary).
    pub standard_error: Option<f64>,
    pub margin_of_error: Option<f64>,
}

impl ConfidenceResult {
    /// Interval width.
    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}
