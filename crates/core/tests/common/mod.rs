//! Shared setup for the integration test binaries

use tracing_subscriber::EnvFilter;

/// Route library logs through the test harness's captured output
#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
