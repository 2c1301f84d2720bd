use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Installs a subscriber that writes through the test harness capture.
/// Safe to call from every test; only the first call has an effect.
pub fn init_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_test_writer()
            .try_init();
    });
}
