//! # repute-core
//!
//! Foundation crate for the Repute fusion engine.
//! Defines the value types, closed enums, errors, and per-component
//! configuration shared by every other crate in the workspace.
//!
//! Two score scales exist in this system and each has exactly one polarity:
//!
//! - **Reputation scale** `[0, 100]`, higher = more trustworthy
//!   (0 = malicious, 100 = clean). Used by risk factors and aggregate
//!   reputation scores.
//! - **Threat scale** `[0, 1]`, higher = more threatening. Used by ensemble
//!   component scores and fused verdicts.
//!
//! The boundary between the two is `threat ≈ 1 − reputation/100`; see
//! [`types::reputation_to_threat`] and [`types::threat_to_reputation`].

pub mod collections;
pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{AnomalyConfig, ConfidenceConfig, EnsembleConfig, ScoringConfig};
pub use errors::FusionError;
pub use types::anomaly::{Anomaly, AnomalyEvidence, AnomalyKind, AnomalySeverity};
pub use types::component::{ComponentFindings, ComponentRole, ComponentScore};
pub use types::confidence::{ConfidenceResult, IntervalMethod};
pub use types::factor::{RiskFactor, RiskSeverity};
pub use types::report::{FactorImportance, Impact, ReputationReport, RiskLevel, ScoreTrend};
pub use types::snapshot::{BaselineStats, BrandAffinityObservation, SubjectSnapshot};
pub use types::verdict::{FusionStrategy, FusionVerdict, ThreatTechnique};
