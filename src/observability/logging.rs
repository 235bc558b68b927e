//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Resolve the filter from `TABROUTE_LOG`, then the configured level
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Always writes to stderr; stdout belongs to scripts and the callback
//! - A second `init` is a no-op rather than a panic

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable overriding the configured level.
pub const LOG_ENV: &str = "TABROUTE_LOG";

/// Build the filter: `TABROUTE_LOG` if set and valid, otherwise `default_level`.
pub fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber.
pub fn init(default_level: &str) {
    let result = tracing_subscriber::registry()
        .with(filter(default_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();

    if result.is_err() {
        tracing::debug!("Logging already initialised");
    }
}
