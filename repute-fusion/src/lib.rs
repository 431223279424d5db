//! # repute-fusion
//!
//! Signal-fusion and calibration engine for the Repute reputation system.
//! Takes independently-computed risk factors and component scores from
//! external detectors and produces a weighted aggregate score, a bounded
//! confidence interval, an anomaly assessment against historical baselines,
//! and an ensemble verdict across disagreeing detectors.
//!
//! All operations are synchronous pure computations over in-memory inputs.
//! The only mutable state is the anomaly baseline table (read-write locked)
//! and the fusion verdict cache (internally synchronized); everything else
//! is deterministic for fixed inputs.

pub mod anomaly;
pub mod confidence;
pub mod ensemble;
pub mod scoring;
pub mod stats;

pub use anomaly::baseline::BaselineTable;
pub use anomaly::detector::AnomalyDetector;
pub use confidence::calculator::ConfidenceCalculator;
pub use ensemble::engine::FusionEngine;
pub use scoring::aggregator::FactorAggregator;
