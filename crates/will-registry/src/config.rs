//! Registry configuration, with environment overrides.

use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ResidualPolicy;

/// Default broadcast capacity for the event bus.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Configuration errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Environment variable present but unparseable.
    #[error("Invalid value for {var}: {reason}")]
    InvalidVar {
        /// Variable name.
        var: &'static str,
        /// Parse failure.
        reason: String,
    },

    /// Event channel capacity must be positive.
    #[error("Event channel capacity must be greater than zero")]
    ZeroCapacity,

    /// Empty log filter.
    #[error("Log level must not be empty")]
    EmptyLogLevel,
}

/// Configuration for a registry service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Service name attached to logs
    pub service_name: String,

    /// Log filter (trace, debug, info, warn, error or an EnvFilter directive)
    pub log_level: String,

    /// Emit JSON formatted logs
    pub json_logs: bool,

    /// What happens to settlement residuals
    pub residual_policy: ResidualPolicy,

    /// Broadcast capacity of the in-process event bus
    pub event_channel_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            service_name: "will-registry".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            residual_policy: ResidualPolicy::Stranded,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl RegistryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `WILL_SERVICE_NAME`: Service name (default: will-registry)
    /// - `WILL_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `WILL_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `WILL_RESIDUAL_POLICY`: `stranded` or `return_to_testator` (default: stranded)
    /// - `WILL_EVENT_CAPACITY`: Event bus capacity (default: 1024)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RegistryConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let residual_policy = match lookup("WILL_RESIDUAL_POLICY") {
            Some(raw) => {
                raw.parse::<ResidualPolicy>()
                    .map_err(|reason| ConfigError::InvalidVar {
                        var: "WILL_RESIDUAL_POLICY",
                        reason,
                    })?
            }
            None => defaults.residual_policy,
        };

        let event_channel_capacity = match lookup("WILL_EVENT_CAPACITY") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidVar {
                    var: "WILL_EVENT_CAPACITY",
                    reason: e.to_string(),
                })?,
            None => defaults.event_channel_capacity,
        };

        Ok(Self {
            service_name: lookup("WILL_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("WILL_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: lookup("WILL_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.json_logs),

            residual_policy,
            event_channel_capacity,
        })
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::EmptyLogLevel);
        }
        Ok(())
    }
}
