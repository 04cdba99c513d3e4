//! Rephrase API client.
//!
//! Provides the main client interface for the rephrase service.

use std::sync::Arc;
use std::time::Duration;

use crate::config::RephraseConfig;
use crate::errors::{RephraseError, RephraseResult};
use crate::resilience::{RetryConfig, RetryPolicy};
use crate::services::{HealthService, RephraseService};
use crate::session::StreamSession;
use crate::transport::{HttpTransport, HttpTransportImpl};

/// Client for the rephrase service.
///
/// The client is cheap to clone; all clones share the same transport,
/// configuration, and retry policy.
///
/// # Example
///
/// ```rust,no_run
/// use rephrase_client::{RephraseClient, RephraseRequest};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RephraseClient::builder()
///     .base_url("http://localhost:8000/api/v1")
///     .build()?;
///
/// let request = RephraseRequest::new("fix this sentence pls");
/// let styles = client.rephrase().create(request).await?;
/// println!("{}", styles.professional);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RephraseClient {
    config: Arc<RephraseConfig>,
    rephrase: Arc<RephraseService>,
    health: Arc<HealthService>,
}

impl RephraseClient {
    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be constructed.
    pub fn new() -> RephraseResult<Self> {
        Self::builder().build()
    }

    /// Creates a client configured from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment value is malformed or the
    /// transport cannot be constructed.
    pub fn from_env() -> RephraseResult<Self> {
        let config = RephraseConfig::from_env()?;
        Self::builder().config(config).build()
    }

    /// Returns a builder for custom configuration.
    pub fn builder() -> RephraseClientBuilder {
        RephraseClientBuilder::new()
    }

    /// Access to rephrase operations.
    pub fn rephrase(&self) -> &RephraseService {
        &self.rephrase
    }

    /// Access to health and version operations.
    pub fn health(&self) -> &HealthService {
        &self.health
    }

    /// The active configuration.
    pub fn config(&self) -> &RephraseConfig {
        &self.config
    }

    /// Creates a new streaming session over this client.
    ///
    /// Each session tracks one run at a time; create one session per
    /// concurrent consumer.
    pub fn session(&self) -> StreamSession {
        StreamSession::new(Arc::clone(&self.rephrase))
    }
}

impl std::fmt::Debug for RephraseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RephraseClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`RephraseClient`].
#[derive(Default)]
pub struct RephraseClientBuilder {
    config: Option<RephraseConfig>,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    transport: Option<Arc<dyn HttpTransport>>,
    retry_config: Option<RetryConfig>,
}

impl RephraseClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a fully constructed configuration.
    ///
    /// Field-level setters on this builder are ignored when a
    /// configuration is supplied.
    #[must_use]
    pub fn config(mut self, config: RephraseConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the API key sent as a bearer token.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the service base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the maximum retry attempts for non-streaming requests.
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Replaces the HTTP transport.
    ///
    /// Used by tests to inject a mock transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replaces the retry configuration.
    #[must_use]
    pub fn retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = Some(retry_config);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP
    /// transport cannot be constructed.
    pub fn build(self) -> RephraseResult<RephraseClient> {
        let config = match self.config {
            Some(config) => config,
            None => {
                let mut builder = RephraseConfig::builder();
                if let Some(api_key) = self.api_key {
                    builder = builder.api_key(api_key);
                }
                if let Some(base_url) = self.base_url {
                    builder = builder.base_url(base_url);
                }
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(max_retries) = self.max_retries {
                    builder = builder.max_retries(max_retries);
                }
                builder.build()?
            }
        };
        let config = Arc::new(config);

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                HttpTransportImpl::new(config.base_url(), config.timeout())
                    .map_err(|err| RephraseError::configuration(err.to_string()))?,
            ),
        };

        let retry_config = self
            .retry_config
            .unwrap_or_else(|| RetryConfig::new().max_retries(config.max_retries()));
        let retry = Arc::new(RetryPolicy::new(retry_config));

        let rephrase = Arc::new(RephraseService::new(
            Arc::clone(&transport),
            Arc::clone(&config),
            Arc::clone(&retry),
        ));
        let health = Arc::new(HealthService::new(transport, retry));

        Ok(RephraseClient {
            config,
            rephrase,
            health,
        })
    }
}

impl std::fmt::Debug for RephraseClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RephraseClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}
