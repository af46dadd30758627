//! Minimal `tracing` setup: a formatted writer to stderr, level controlled
//! by `RUST_LOG`. No distributed tracing export; a single batch run has
//! nothing to correlate across a network for.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global `tracing` subscriber. Safe to call once per
/// process; a second call is a no-op error that this function swallows,
/// since tests may call it more than once.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
