//! Retry with exponential backoff for rephrase requests.
//!
//! The policy wraps the single-shot rephrase call and the meta
//! endpoints. Streaming requests take [`RetryPolicy::execute_streaming`]
//! instead, which issues the request exactly once.

use std::future::Future;
use std::time::Duration;

use tracing::instrument;

use crate::config::DEFAULT_MAX_RETRIES;
use crate::errors::RephraseResult;

/// Backoff settings for retryable request failures.
///
/// The default budget matches
/// [`config::DEFAULT_MAX_RETRIES`](crate::config::DEFAULT_MAX_RETRIES),
/// so a policy built from defaults behaves like a client built from a
/// default [`RephraseConfig`](crate::config::RephraseConfig).
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retry attempts allowed after the initial try.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any backoff delay.
    pub max_delay: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier: f64,
    /// Whether to spread delays by up to 25% to avoid thundering herds.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Creates a new retry configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that never retries.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Sets the retry budget.
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the upper bound on backoff delays.
    #[must_use]
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the growth factor between consecutive delays.
    #[must_use]
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Enables or disables delay jitter.
    #[must_use]
    pub fn jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before retry number `attempt` (1-based).
    ///
    /// A server-supplied retry-after hint wins over backoff and is
    /// used verbatim, without cap or jitter.
    fn delay_before(&self, attempt: u32, server_hint: Option<Duration>) -> Duration {
        if let Some(hint) = server_hint {
            return hint;
        }

        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let seconds = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        // Non-finite backoff collapses to the cap
        let capped = if seconds.is_finite() {
            seconds.clamp(0.0, self.max_delay.as_secs_f64())
        } else {
            self.max_delay.as_secs_f64()
        };

        let delay = Duration::from_secs_f64(capped);
        if self.jitter {
            delay.mul_f64(1.0 + rand::random::<f64>() * 0.25)
        } else {
            delay
        }
    }
}

/// Runs operations under a [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Creates a policy from the given configuration.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Runs `operation`, retrying retryable failures with backoff.
    #[instrument(skip(self, operation), fields(max_retries = self.config.max_retries))]
    pub async fn execute<T, F, Fut>(&self, operation: F) -> RephraseResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = RephraseResult<T>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::debug!(attempt, "Request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if attempt < self.config.max_retries && err.is_retryable() => {
                    attempt += 1;
                    let delay = self.config.delay_before(attempt, err.retry_after());
                    tracing::debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying after failure"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Runs a streaming operation exactly once, outside the backoff
    /// loop.
    ///
    /// A partially consumed stream cannot be replayed, so streaming
    /// requests never retry, whatever the configured budget.
    pub async fn execute_streaming<T, F, Fut>(&self, operation: F) -> RephraseResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RephraseResult<T>>,
    {
        operation().await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
