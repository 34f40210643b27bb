//! # Telemetry
//!
//! Process-wide `tracing` subscriber setup.

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Filter from `RUST_LOG`, or `level` when it is unset or invalid.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the fmt subscriber as the global default.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(level: &str) -> Result<(), SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter(level))
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
