//! Client configuration

use std::time::Duration;

/// Base address used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Request timeout used when none (or zero) is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Client configuration for talking to the HR backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080"), no trailing slash
    pub base_url: String,

    /// Per-request timeout, always finite
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the request timeout; zero falls back to the default
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            timeout
        };
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
