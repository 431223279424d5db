//! Per-feature baseline statistics.
//!
//! The only read-write state in the core. Detection takes a read lock per
//! feature lookup; `update` takes the write lock for one feature at a time.
//! A detection racing an update may see the pre-update baseline, which is
//! acceptable: baselines change slowly, so stale reads are harmless.

use std::sync::{PoisonError, RwLock};

use repute_core::collections::FxHashMap;
use repute_core::types::snapshot::BaselineStats;

use crate::stats;

/// Process-wide baseline cache, keyed by feature name. Initialized empty,
/// grows monotonically unless explicitly reset.
#[derive(Debug, Default)]
pub struct BaselineTable {
    stats: RwLock<FxHashMap<String, BaselineStats>>,
}

impl BaselineTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute and replace the stored statistics for one feature. A no-op
    /// below two samples: one observation defines no spread.
    pub fn update(&self, feature: &str, values: &[f64]) {
        if values.len() < 2 {
            return;
        }
        let computed = BaselineStats {
            mean: stats::mean(values),
            std: stats::sample_std(values),
            median: stats::median(values),
            q1: stats::percentile(values, 25.0),
            q3: stats::percentile(values, 75.0),
            min: values.iter().cloned().fold(f64::INFINITY, f64::min),
            max: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            count: values.len(),
        };
        self.stats
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(feature.to_string(), computed);
    }

    /// Snapshot of one feature's baseline, if tracked.
    pub fn get(&self, feature: &str) -> Option<BaselineStats> {
        self.stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(feature)
            .copied()
    }

    /// Number of tracked features.
    pub fn len(&self) -> usize {
        self.stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all baselines.
    pub fn reset(&self) {
        self.stats
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
