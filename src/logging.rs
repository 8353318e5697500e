//! Log initialization for the embedding plugin

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The filter honors `PATCHGUARD_LOG` (default "info"). Returns quietly
/// when a subscriber is already installed, so the embedding plugin may
/// bring its own.
pub fn init() {
    let filter =
        EnvFilter::try_from_env("PATCHGUARD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
