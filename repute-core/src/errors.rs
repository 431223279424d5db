//! Fusion-layer errors.
//!
//! Only malformed *arguments* are errors. Degenerate-but-legitimate states
//! (zero trials, empty factor lists, fewer than two baseline samples, zero
//! standard deviation, zero total weight) produce documented default results
//! instead: "no signal" is a normal state for this domain, and a NaN
//! propagated into a risk level would be a silent correctness failure.

/// Errors raised at the boundary of public fusion operations.
#[derive(Debug, thiserror::Error)]
pub enum FusionError {
    #[error("invalid proportion: {successes} successes out of {trials} trials")]
    InvalidProportion { successes: u64, trials: u64 },

    #[error("confidence level {level} outside (0, 1)")]
    InvalidConfidenceLevel { level: f64 },

    #[error("{field} = {value} outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl FusionError {
    /// Range-check a value, including the non-finite case (NaN/Inf never
    /// enters the core through a validated boundary).
    pub fn check_range(
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), FusionError> {
        if !value.is_finite() || value < min || value > max {
            return Err(FusionError::OutOfRange {
                field,
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}
