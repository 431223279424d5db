//! Ensemble fusion across independent component detectors.

pub mod cache;
pub mod engine;

pub use cache::VerdictCache;
pub use engine::FusionEngine;
