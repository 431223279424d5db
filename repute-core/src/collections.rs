//! Shared collection type aliases.
//!
//! FxHash is a non-cryptographic hasher, faster than SipHash for the short
//! string keys used throughout (feature names, component names).

pub use rustc_hash::{FxHashMap, FxHashSet};
