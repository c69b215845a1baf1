//! Test Telemetry
//!
//! Opt-in tracing output for test runs. Filtered by `RUST_LOG` and routed
//! through the libtest capture writer so passing tests stay quiet.

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static INIT: Lazy<()> = Lazy::new(|| {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .init();
});

/// Installs the test subscriber once per process
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    Lazy::force(&INIT);
}
