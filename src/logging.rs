//! Logging setup shared by the binaries.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `GAMMA_LOG=debug`.
pub const LOG_ENV: &str = "GAMMA_LOG";

/// Installs a stderr subscriber filtered by `GAMMA_LOG`, defaulting to `warn`.
///
/// Does nothing if a subscriber is already installed.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
