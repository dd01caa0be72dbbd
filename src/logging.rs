//! Tracing bootstrap for hosts that want the engine's default logging setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes a global tracing subscriber honoring `RUST_LOG`, defaulting to
/// `info`. Safe to call more than once; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
