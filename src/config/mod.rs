//! Configuration module for the rephrase client.
//!
//! Provides configuration management including the service base URL,
//! timeouts, retry settings, and an optional API key for deployments
//! that sit behind an authenticating gateway.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::errors::{RephraseError, RephraseResult};

/// Default base URL for the rephrase service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum retry attempts for non-streaming requests.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Maximum accepted input text length, in characters.
///
/// Mirrors the service's own request validation so oversized text is
/// rejected locally instead of with a 422 round trip.
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Configuration for the rephrase client.
#[derive(Clone)]
pub struct RephraseConfig {
    /// Optional API key (stored securely). The reference service is
    /// unauthenticated; a key is sent as a bearer token when configured.
    pub(crate) api_key: Option<SecretString>,
    /// Base URL for API requests.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for non-streaming requests.
    pub max_retries: u32,
    /// Custom headers to include in requests.
    pub custom_headers: Vec<(String, String)>,
}

impl RephraseConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> RephraseConfigBuilder {
        RephraseConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REPHRASE_BASE_URL` (optional): service base URL
    /// - `REPHRASE_API_KEY` (optional): bearer key for gateway deployments
    /// - `REPHRASE_TIMEOUT` (optional): request timeout in seconds
    /// - `REPHRASE_MAX_RETRIES` (optional): maximum retry attempts
    pub fn from_env() -> RephraseResult<Self> {
        let mut builder = RephraseConfigBuilder::new();

        if let Ok(base_url) = std::env::var("REPHRASE_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Ok(api_key) = std::env::var("REPHRASE_API_KEY") {
            builder = builder.api_key(api_key);
        }

        if let Ok(timeout_str) = std::env::var("REPHRASE_TIMEOUT") {
            if let Ok(timeout_secs) = timeout_str.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(timeout_secs));
            }
        }

        if let Ok(retries_str) = std::env::var("REPHRASE_MAX_RETRIES") {
            if let Ok(retries) = retries_str.parse::<u32>() {
                builder = builder.max_retries(retries);
            }
        }

        builder.build()
    }

    /// Returns the API key, exposing the secret, when one is configured.
    pub(crate) fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|key| key.expose_secret().as_str())
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let key = key.expose_secret();
            // char_indices keeps the slice on a character boundary
            match key.char_indices().rev().nth(3) {
                Some((start, _)) if start > 0 => format!("...{}", &key[start..]),
                _ => "****".to_string(),
            }
        })
    }

    /// Returns the full URL for an endpoint.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Returns the service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the maximum retry attempts for non-streaming requests.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl std::fmt::Debug for RephraseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RephraseConfig")
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Builder for `RephraseConfig`.
#[derive(Default)]
pub struct RephraseConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    custom_headers: Vec<(String, String)>,
}

impl RephraseConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Sets the maximum retry attempts.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> RephraseResult<RephraseConfig> {
        if let Some(ref api_key) = self.api_key {
            if api_key.is_empty() {
                return Err(RephraseError::Configuration {
                    message: "API key cannot be empty".to_string(),
                });
            }
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        // The service is commonly deployed locally over plain HTTP.
        let parsed = url::Url::parse(&base_url)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(RephraseError::Configuration {
                message: format!("Base URL scheme must be http or https, got {}", parsed.scheme()),
            });
        }

        Ok(RephraseConfig {
            api_key: self.api_key.map(SecretString::new),
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            custom_headers: self.custom_headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment tests share process-wide state; serialize them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_config_builder_success() {
        let config = RephraseConfig::builder()
            .api_key("rpk_test_api_key_12345")
            .base_url("https://rephrase.example.com/api/v1")
            .timeout(Duration::from_secs(10))
            .max_retries(5)
            .build()
            .unwrap();

        assert_eq!(config.api_key(), Some("rpk_test_api_key_12345"));
        assert_eq!(config.base_url, "https://rephrase.example.com/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 5);
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = RephraseConfig::builder().build().unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert!(config.api_key().is_none());
        assert!(config.api_key_hint().is_none());
    }

    #[test]
    fn test_config_builder_empty_api_key() {
        let result = RephraseConfig::builder().api_key("").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_builder_plain_http_accepted() {
        let config = RephraseConfig::builder()
            .base_url("http://localhost:8000/api/v1")
            .build()
            .unwrap();

        assert_eq!(config.base_url, "http://localhost:8000/api/v1");
    }

    #[test]
    fn test_config_builder_invalid_base_url() {
        assert!(RephraseConfig::builder()
            .base_url("ftp://rephrase.example.com")
            .build()
            .is_err());

        assert!(RephraseConfig::builder()
            .base_url("not a url")
            .build()
            .is_err());
    }

    #[test]
    fn test_config_builder_trims_trailing_slash() {
        let config = RephraseConfig::builder()
            .base_url("http://localhost:8000/api/v1/")
            .build()
            .unwrap();

        assert_eq!(config.base_url, "http://localhost:8000/api/v1");
        assert_eq!(
            config.endpoint_url("/rephrase"),
            "http://localhost:8000/api/v1/rephrase"
        );
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let config = RephraseConfig::builder()
            .api_key("rpk_super_secret")
            .build()
            .unwrap();

        let debug = format!("{:?}", config);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("rpk_super_secret"));
    }

    #[test]
    fn test_api_key_hint() {
        let config = RephraseConfig::builder()
            .api_key("rpk_test_2345")
            .build()
            .unwrap();

        assert_eq!(config.api_key_hint().as_deref(), Some("...2345"));
    }

    #[test]
    fn test_api_key_hint_multibyte_key() {
        let config = RephraseConfig::builder()
            .api_key("rpk_clé_café")
            .build()
            .unwrap();

        assert_eq!(config.api_key_hint().as_deref(), Some("...café"));

        let short = RephraseConfig::builder().api_key("clé").build().unwrap();
        assert_eq!(short.api_key_hint().as_deref(), Some("****"));
    }

    #[test]
    fn test_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("REPHRASE_BASE_URL", "http://rephrase.internal:9000/api/v1");
        std::env::set_var("REPHRASE_TIMEOUT", "45");
        std::env::set_var("REPHRASE_MAX_RETRIES", "7");

        let config = RephraseConfig::from_env().unwrap();

        std::env::remove_var("REPHRASE_BASE_URL");
        std::env::remove_var("REPHRASE_TIMEOUT");
        std::env::remove_var("REPHRASE_MAX_RETRIES");

        assert_eq!(config.base_url, "http://rephrase.internal:9000/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.max_retries, 7);
    }

    #[test]
    fn test_from_env_defaults_without_vars() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::remove_var("REPHRASE_BASE_URL");
        std::env::remove_var("REPHRASE_API_KEY");
        std::env::remove_var("REPHRASE_TIMEOUT");
        std::env::remove_var("REPHRASE_MAX_RETRIES");

        let config = RephraseConfig::from_env().unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
