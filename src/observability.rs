// Copyright (c) 2025 - Cowboy AI, Inc.
//! Tracing setup for binaries

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// `RUST_LOG` directives are honoured; `default_level` applies otherwise.
/// Output goes to stderr so stdout stays free for machine-readable results.
pub fn init_tracing(default_level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    // a subscriber may already be installed by tests or an embedding host
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
