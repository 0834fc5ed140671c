//! Structured logging setup.
//!
//! The library itself only emits `tracing` events; binaries, demos and tests
//! call [`init_logging`] to install a subscriber.

use crate::config::LoggingConfig;
use crate::error::{MultiaddrError, Result};
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber according to `config`.
///
/// `RUST_LOG` takes precedence over the configured level when set.
///
/// # Errors
/// Returns `ConfigError` if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| {
        MultiaddrError::ConfigError(format!("Failed to install log subscriber: {e}"))
    })?;

    tracing::info!(app = %config.app_name, level = %config.log_level, "Logging initialized");
    Ok(())
}
