//! Rephrase service.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use super::{response_error, status_error, transport_error};
use crate::config::RephraseConfig;
use crate::decode::RephraseStream;
use crate::errors::{RephraseError, RephraseResult};
use crate::resilience::RetryPolicy;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::types::rephrase::{RephraseRequest, StyleSet};

/// Service for submitting text and receiving the four style variants.
pub struct RephraseService {
    transport: Arc<dyn HttpTransport>,
    config: Arc<RephraseConfig>,
    retry: Arc<RetryPolicy>,
}

impl RephraseService {
    /// Creates a new rephrase service.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        config: Arc<RephraseConfig>,
        retry: Arc<RetryPolicy>,
    ) -> Self {
        Self {
            transport,
            config,
            retry,
        }
    }

    /// Rewrites text in all four styles with a single request.
    #[instrument(skip(self, request), fields(text_chars = request.text.chars().count()))]
    pub async fn create(&self, request: RephraseRequest) -> RephraseResult<StyleSet> {
        request.validate()?;

        let http_request = self.build_request(&request, false)?;
        let response = self.send_checked(http_request).await?;

        parse_styles(&response)
    }

    /// Rewrites text with a custom timeout for this request only.
    pub async fn create_with_timeout(
        &self,
        request: RephraseRequest,
        timeout: Duration,
    ) -> RephraseResult<StyleSet> {
        request.validate()?;

        let mut http_request = self.build_request(&request, false)?;
        http_request.timeout = Some(timeout);
        let response = self.send_checked(http_request).await?;

        parse_styles(&response)
    }

    /// Sends through the retry policy.
    ///
    /// Non-success statuses are mapped inside the retried operation so
    /// retryable ones (429, 5xx) re-enter the backoff loop.
    async fn send_checked(&self, http_request: HttpRequest) -> RephraseResult<HttpResponse> {
        self.retry
            .execute(|| {
                let transport = Arc::clone(&self.transport);
                let req = http_request.clone();
                async move {
                    let response = transport.send(req).await.map_err(transport_error)?;
                    if response.status == 200 {
                        Ok(response)
                    } else {
                        Err(response_error(&response))
                    }
                }
            })
            .await
    }

    /// Opens a streaming rephrase request.
    ///
    /// The returned stream yields a style snapshot after every frame
    /// that adds recoverable information. Streaming requests are never
    /// retried.
    #[instrument(skip(self, request), fields(text_chars = request.text.chars().count()))]
    pub async fn create_stream(&self, request: RephraseRequest) -> RephraseResult<RephraseStream> {
        request.validate()?;

        let http_request = self.build_request(&request, true)?;

        let response = self
            .retry
            .execute_streaming(|| async move {
                self.transport
                    .send_streaming(http_request)
                    .await
                    .map_err(transport_error)
            })
            .await?;

        if response.status != 200 {
            return Err(status_error(response.status, &response.headers));
        }

        RephraseStream::new(response)
    }

    /// Builds an HTTP request for the rephrase endpoints.
    fn build_request(
        &self,
        request: &RephraseRequest,
        streaming: bool,
    ) -> RephraseResult<HttpRequest> {
        let body = serde_json::to_vec(request)?;

        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        if streaming {
            headers.insert("Accept".to_string(), "text/event-stream".to_string());
        }

        for (name, value) in &self.config.custom_headers {
            headers.insert(name.clone(), value.clone());
        }

        if let Some(api_key) = self.config.api_key() {
            headers.insert("Authorization".to_string(), format!("Bearer {api_key}"));
        }

        let path = if streaming { "rephrase-stream" } else { "rephrase" };

        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: path.to_string(),
            headers,
            body: Some(body),
            timeout: None,
        })
    }
}

/// Parses the four-field style response.
fn parse_styles(response: &HttpResponse) -> RephraseResult<StyleSet> {
    serde_json::from_slice(&response.body).map_err(|e| RephraseError::Server {
        message: format!("Failed to parse response: {e}"),
        status_code: response.status,
    })
}

impl std::fmt::Debug for RephraseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RephraseService").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockResponse, MockTransport};
    use crate::resilience::RetryConfig;

    fn service_with(transport: Arc<MockTransport>, retry: RetryConfig) -> RephraseService {
        RephraseService::new(
            transport,
            Arc::new(RephraseConfig::builder().build().unwrap()),
            Arc::new(RetryPolicy::new(retry)),
        )
    }

    #[tokio::test]
    async fn test_create_retries_on_server_error() {
        let transport = MockTransport::shared();
        transport.queue_error(500, "transient");
        transport.queue(MockResponse::json(&serde_json::json!({
            "professional": "Hello.",
            "casual": "hi",
            "polite": "Hello there.",
            "social_media": "hi!"
        })));

        let service = service_with(
            Arc::clone(&transport),
            RetryConfig::new()
                .max_retries(2)
                .initial_delay(Duration::from_millis(1))
                .jitter(false),
        );

        let styles = service
            .create(RephraseRequest::new("hello"))
            .await
            .unwrap();

        assert_eq!(styles.casual, "hi");
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_create_stream_not_retried_on_error_status() {
        let transport = MockTransport::shared();
        transport.queue_error(500, "LLM call failed");
        transport.queue(MockResponse::stream(&["{\"casual\": \"yo\"}"]));

        let service = service_with(
            Arc::clone(&transport),
            RetryConfig::new()
                .max_retries(3)
                .initial_delay(Duration::from_millis(1))
                .jitter(false),
        );

        let err = service
            .create_stream(RephraseRequest::new("hello"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RephraseError::Server {
                status_code: 500,
                ..
            }
        ));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_create_maps_error_detail() {
        let transport = MockTransport::shared();
        transport.queue_error(422, "Text must not be empty");

        let service = service_with(Arc::clone(&transport), RetryConfig::no_retries());

        let err = service
            .create(RephraseRequest::new("hello"))
            .await
            .unwrap_err();

        match err {
            RephraseError::Validation { message, .. } => {
                assert_eq!(message, "Text must not be empty");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
