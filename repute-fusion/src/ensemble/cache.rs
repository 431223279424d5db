//! Verdict cache: Moka in-memory, keyed by an xxh3 digest of the subject
//! and its optional extra context. Bounded and internally synchronized;
//! concurrent inserts may race on admission but can never corrupt the map.

use moka::sync::Cache;
use xxhash_rust::xxh3::Xxh3;

use repute_core::types::verdict::FusionVerdict;

fn make_key(subject: &str, context: Option<&str>) -> u64 {
    let mut hasher = Xxh3::new();
    hasher.update(subject.as_bytes());
    // Separator plus presence tag keeps ("ab", None), ("a", Some("b")) and
    // ("a", Some("")) all distinct.
    match context {
        Some(context) => {
            hasher.update(&[0xff, 1]);
            hasher.update(context.as_bytes());
        }
        None => hasher.update(&[0xff, 0]),
    }
    hasher.digest()
}

/// Bounded fusion-verdict cache (TinyLFU admission).
pub struct VerdictCache {
    inner: Cache<u64, FusionVerdict>,
}

impl VerdictCache {
    /// Create a cache holding up to `capacity` verdicts.
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn get(&self, subject: &str, context: Option<&str>) -> Option<FusionVerdict> {
        self.inner.get(&make_key(subject, context))
    }

    pub fn insert(&self, subject: &str, context: Option<&str>, verdict: FusionVerdict) {
        self.inner.insert(make_key(subject, context), verdict);
    }

    /// Number of cached verdicts.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for VerdictCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_separates_subject_and_context() {
        assert_ne!(make_key("ab", None), make_key("a", Some("b")));
        assert_ne!(make_key("a", None), make_key("a", Some("")));
        assert_eq!(make_key("a", Some("b")), make_key("a", Some("b")));
    }
}
