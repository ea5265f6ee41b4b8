//! Tracing bootstrap for the console.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing/logging pipeline.
///
/// `RUST_LOG` wins when set; otherwise the console logs at `info` with its
/// own crates at `debug` in local development builds.
pub fn init() {
    let default_filter = if cfg!(debug_assertions) {
        "info,boek_admin=debug,boek_draft=debug"
    } else {
        "info"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // try_init: tests and embedding binaries may already have a subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    tracing::debug!("telemetry initialized");
}
