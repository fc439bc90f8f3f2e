//! API client configuration.
//!
//! Settings come from environment variables with defaults:
//!
//! - `CIVIC_PORTAL_API_BASE`: base URL every endpoint path is appended to
//!   (default [`DEFAULT_API_BASE`]).
//! - `CIVIC_PORTAL_TIMEOUT_SECS`: per-request transport timeout in seconds
//!   (default [`DEFAULT_TIMEOUT_SECS`]).

use std::time::Duration;

use crate::PortalError;

/// Base URL used when `CIVIC_PORTAL_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8080/api";

/// Timeout used when `CIVIC_PORTAL_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`crate::HttpPortalApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Common prefix of every endpoint, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout enforced by the transport.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Creates a config for `base_url` with the default timeout.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base(base_url),
            ..Self::default()
        }
    }

    /// Reads the config from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Config`] if a variable is set to an invalid
    /// value.
    pub fn from_env() -> Result<Self, PortalError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Replaces the base URL, e.g. with a command-line override.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base(base_url);
        self
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PortalError> {
        let base_url = lookup("CIVIC_PORTAL_API_BASE")
            .map_or_else(|| DEFAULT_API_BASE.to_string(), |v| normalize_base(&v));
        if base_url.is_empty() {
            return Err(PortalError::Config {
                message: "CIVIC_PORTAL_API_BASE is empty".to_string(),
            });
        }

        let timeout_secs = match lookup("CIVIC_PORTAL_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| PortalError::Config {
                message: format!("CIVIC_PORTAL_TIMEOUT_SECS={raw:?} is not a number: {e}"),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn normalize_base(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
