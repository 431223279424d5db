//! Value types exchanged between detectors, the fusion layer, and callers.

pub mod anomaly;
pub mod component;
pub mod confidence;
pub mod factor;
pub mod report;
pub mod snapshot;
pub mod verdict;

/// Convert a reputation score (0-100, higher = safer) to a threat score
/// (0-1, higher = more threatening).
pub fn reputation_to_threat(reputation: f64) -> f64 {
    (1.0 - reputation / 100.0).clamp(0.0, 1.0)
}

/// Convert a threat score (0-1) back to the reputation scale (0-100).
pub fn threat_to_reputation(threat: f64) -> f64 {
    ((1.0 - threat) * 100.0).clamp(0.0, 100.0)
}
