//! Client configuration.

use std::time::Duration;

use crate::error::{ApiError, Result};

/// Service address used when nothing is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const API_URL_ENV: &str = "SHOPLIST_API_URL";
pub const TIMEOUT_ENV: &str = "SHOPLIST_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash, e.g. `http://10.0.2.2:5000`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `SHOPLIST_API_URL` and `SHOPLIST_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(API_URL_ENV)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout_secs = match lookup(TIMEOUT_ENV) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ApiError::config(format!("{} is not a number of seconds: '{}'", TIMEOUT_ENV, raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Self::validated(&base_url, timeout_secs)
    }

    /// Builds a config from already-parsed values, rejecting a non-HTTP base
    /// URL and a zero timeout.
    pub fn validated(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let trimmed = base_url.trim();
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(ApiError::config(format!(
                "API URL must start with http:// or https://, got '{}'",
                trimmed
            )));
        }
        if timeout_secs == 0 {
            return Err(ApiError::config("request timeout must be positive"));
        }
        Ok(Self::new(trimmed).with_timeout(Duration::from_secs(timeout_secs)))
    }
}
