//! Tracing bootstrap.
//!
//! The core itself only emits spans/events; installing a subscriber is the
//! embedding application's choice. `init` is provided for binaries and tests
//! that want the standard env-filtered stderr subscriber.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the default subscriber: env-filtered (`REPUTE_LOG`, falling back
/// to `info`), compact, to stderr. Safe to call more than once.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("REPUTE_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    });
}
