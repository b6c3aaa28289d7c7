//! Log subscriber setup.
//!
//! The filter is built from `RegistryConfig::log_level` alone; `from_env`
//! has already resolved `WILL_LOG_LEVEL` over `RUST_LOG`. JSON output is
//! meant for containers, the pretty layer for development.

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::RegistryConfig;

/// Logging setup failures.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Filter directive did not parse.
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber was already installed.
    #[error("Failed to install subscriber: {0}")]
    Install(String),
}

/// Build the env filter for `config`.
pub fn env_filter(config: &RegistryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::InvalidFilter(e.to_string()))
}

/// Install the global subscriber.
pub fn init_logging(config: &RegistryConfig) -> Result<(), TelemetryError> {
    let env_filter = env_filter(config)?;

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::Install(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::Install(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        residual_policy = ?config.residual_policy,
        "Logging initialized"
    );

    Ok(())
}
