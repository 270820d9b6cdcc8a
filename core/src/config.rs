//! Client configuration.
//!
//! `ClientConfig` can be built in code, or loaded from `FURSIGHT_*`
//! environment variables (`FURSIGHT_API_KEY`, `FURSIGHT_BASE_URL`,
//! `FURSIGHT_TIMEOUT_MS`, `FURSIGHT_MAX_RETRIES`,
//! `FURSIGHT_MIN_REQUEST_INTERVAL_MS`, `FURSIGHT_DEFAULT_RETRY_AFTER_MS`).
//! Only the API key is required. Durations are stored in milliseconds.

use std::fmt;
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::error::FurSightError;

pub const DEFAULT_BASE_URL: &str = "https://api.fursight.ai";

#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-attempt timeout. Must be non-zero.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
    /// Wait applied to a 429 response that carries no usable `Retry-After`.
    #[serde(default = "default_retry_after_ms")]
    pub default_retry_after_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_min_request_interval_ms() -> u64 {
    100
}

fn default_retry_after_ms() -> u64 {
    60_000
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            min_request_interval_ms: default_min_request_interval_ms(),
            default_retry_after_ms: default_retry_after_ms(),
        }
    }

    /// Load from `FURSIGHT_*` environment variables.
    pub fn from_env() -> Result<Self, FurSightError> {
        let source = Config::builder()
            .add_source(Environment::with_prefix("FURSIGHT").try_parsing(true))
            .build()?;
        Self::from_config(source)
    }

    /// Deserialize from any `config` source. A zero timeout is rejected.
    pub fn from_config(source: Config) -> Result<Self, FurSightError> {
        let config: Self = source.try_deserialize()?;
        if config.timeout_ms == 0 {
            return Err(ConfigError::Message("timeout_ms must be greater than zero".into()).into());
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = as_millis(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval_ms = as_millis(interval);
        self
    }

    pub fn with_default_retry_after(mut self, wait: Duration) -> Self {
        self.default_retry_after_ms = as_millis(wait);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    pub fn default_retry_after(&self) -> Duration {
        Duration::from_millis(self.default_retry_after_ms)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("min_request_interval_ms", &self.min_request_interval_ms)
            .field("default_retry_after_ms", &self.default_retry_after_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let config = ClientConfig::new("key");
        assert_eq!(config.base_url, "https://api.fursight.ai");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.min_request_interval(), Duration::from_millis(100));
        assert_eq!(config.default_retry_after(), Duration::from_secs(60));
    }

    #[test]
    fn from_config_fills_missing_keys_with_defaults() {
        let source = Config::builder()
            .set_override("api_key", "abc")
            .unwrap()
            .set_override("max_retries", 5)
            .unwrap()
            .build()
            .unwrap();
        let config = ClientConfig::from_config(source).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn from_config_requires_api_key() {
        let source = Config::builder()
            .set_override("base_url", "http://localhost:3000")
            .unwrap()
            .build()
            .unwrap();
        let err = ClientConfig::from_config(source).unwrap_err();
        assert!(matches!(err, FurSightError::Config(_)));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ClientConfig::new("super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn builder_setters_override_defaults() {
        let config = ClientConfig::new("k")
            .with_base_url("http://127.0.0.1:8080/")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(1)
            .with_min_request_interval(Duration::from_millis(250))
            .with_default_retry_after(Duration::from_secs(2));
        assert_eq!(config.base_url, "http://127.0.0.1:8080/");
        assert_eq!(config.timeout_ms, 5_000);
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.min_request_interval_ms, 250);
        assert_eq!(config.default_retry_after_ms, 2_000);
    }

    #[test]
    fn sub_second_durations_are_kept() {
        let config = ClientConfig::new("k")
            .with_timeout(Duration::from_millis(500))
            .with_default_retry_after(Duration::from_millis(1500));
        assert_eq!(config.timeout(), Duration::from_millis(500));
        assert_eq!(config.default_retry_after(), Duration::from_millis(1500));

        let transport = crate::http::UreqTransport::new(config.timeout());
        assert_eq!(transport.timeout(), Duration::from_millis(500));
    }

    #[test]
    fn oversized_interval_saturates() {
        let config = ClientConfig::new("k").with_min_request_interval(Duration::MAX);
        assert_eq!(config.min_request_interval_ms, u64::MAX);
    }

    #[test]
    fn from_config_rejects_zero_timeout() {
        let source = Config::builder()
            .set_override("api_key", "abc")
            .unwrap()
            .set_override("timeout_ms", 0)
            .unwrap()
            .build()
            .unwrap();
        let err = ClientConfig::from_config(source).unwrap_err();
        assert!(matches!(err, FurSightError::Config(_)));
        assert!(err.to_string().contains("timeout_ms"), "{err}");
    }
}
