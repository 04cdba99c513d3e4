//! Health and version service.

use std::sync::Arc;
use tracing::instrument;

use super::{response_error, transport_error};
use crate::errors::{RephraseError, RephraseResult};
use crate::resilience::RetryPolicy;
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::rephrase::{HealthStatus, VersionInfo};

/// Service for the health and version endpoints.
pub struct HealthService {
    transport: Arc<dyn HttpTransport>,
    retry: Arc<RetryPolicy>,
}

impl HealthService {
    /// Creates a new health service.
    pub fn new(transport: Arc<dyn HttpTransport>, retry: Arc<RetryPolicy>) -> Self {
        Self { transport, retry }
    }

    /// Checks service health.
    #[instrument(skip(self))]
    pub async fn check(&self) -> RephraseResult<HealthStatus> {
        self.get_json("health").await
    }

    /// Returns service version information.
    #[instrument(skip(self))]
    pub async fn version(&self) -> RephraseResult<VersionInfo> {
        self.get_json("version").await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> RephraseResult<T> {
        let http_request = HttpRequest::get(path);

        let response = self
            .retry
            .execute(|| {
                let transport = Arc::clone(&self.transport);
                let req = http_request.clone();
                async move {
                    let response = transport.send(req).await.map_err(transport_error)?;
                    if response.is_success() {
                        Ok(response)
                    } else {
                        Err(response_error(&response))
                    }
                }
            })
            .await?;

        serde_json::from_slice(&response.body).map_err(|e| RephraseError::Server {
            message: format!("Failed to parse response: {e}"),
            status_code: response.status,
        })
    }
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService").finish()
    }
}
