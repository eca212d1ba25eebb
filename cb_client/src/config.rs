//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use codebreaker::DEFAULT_PALETTE_SIZE;
use std::time::Duration;

/// Smallest palette offered at the console.
pub const MIN_CONSOLE_PALETTE: usize = 3;

/// Largest palette offered at the console; there are nine named colors.
pub const MAX_CONSOLE_PALETTE: usize = 9;

const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the codebreaker service
    pub server_url: String,
    /// Palette size used by `start` without an argument
    pub palette_size: usize,
    /// Per-request timeout
    pub request_timeout: Duration,
}

/// Values given on the command line, which win over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub server_url: Option<String>,
    pub palette_size: Option<usize>,
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but can't be parsed
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F, overrides: ConfigOverrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = overrides
            .server_url
            .or_else(|| lookup("CODEBREAKER_SERVER_URL"))
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let palette_size = match overrides.palette_size {
            Some(size) => size,
            None => parse_var_or(&lookup, "CODEBREAKER_PALETTE_SIZE", DEFAULT_PALETTE_SIZE)?,
        };

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => parse_var_or(&lookup, "CODEBREAKER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
        };

        Ok(ClientConfig {
            server_url,
            palette_size,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "CODEBREAKER_SERVER_URL".to_string(),
                reason: format!("'{}' must start with http:// or https://", self.server_url),
            });
        }

        if !(MIN_CONSOLE_PALETTE..=MAX_CONSOLE_PALETTE).contains(&self.palette_size) {
            return Err(ConfigError::Invalid {
                var: "CODEBREAKER_PALETTE_SIZE".to_string(),
                reason: format!(
                    "Must be between {} and {}",
                    MIN_CONSOLE_PALETTE, MAX_CONSOLE_PALETTE
                ),
            });
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: "CODEBREAKER_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse a variable with default fallback when unset
fn parse_var_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("'{}' is not a valid number", value),
        }),
    }
}
