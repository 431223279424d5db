//! Weighted risk-factor aggregation into a reputation report.

pub mod aggregator;

pub use aggregator::FactorAggregator;
