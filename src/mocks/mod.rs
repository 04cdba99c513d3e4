//! Mock implementations for testing.
//!
//! Provides a mock transport and response fixtures for unit testing
//! without a running rephrase service.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use crate::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, StreamingResponse, TransportError,
};

/// Mock HTTP transport for testing.
pub struct MockTransport {
    responses: Mutex<Vec<MockResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Mutex<Option<MockResponse>>,
}

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Request headers.
    pub headers: HashMap<String, String>,
}

impl RecordedRequest {
    /// Deserializes the recorded body as JSON.
    pub fn body_json(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
    /// Whether the streaming body stays open after its last byte.
    pub hang: bool,
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status: 200,
            headers,
            body,
            hang: false,
        }
    }

    /// Creates an error response in the service's `detail` shape.
    pub fn error(status: u16, detail: &str) -> Self {
        let body = serde_json::to_vec(&serde_json::json!({ "detail": detail }))
            .unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status,
            headers,
            body,
            hang: false,
        }
    }

    /// Creates a streaming response carrying the payloads as `data: `
    /// frames.
    pub fn stream(payloads: &[&str]) -> Self {
        let body: String = payloads.iter().map(|p| format!("data: {p}\n\n")).collect();
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            "text/event-stream".to_string(),
        );

        Self {
            status: 200,
            headers,
            body: body.into_bytes(),
            hang: false,
        }
    }

    /// Like [`stream`](Self::stream), but the stream never ends after
    /// the last payload, letting tests cancel mid-stream.
    pub fn hanging_stream(payloads: &[&str]) -> Self {
        Self {
            hang: true,
            ..Self::stream(payloads)
        }
    }

    /// Creates a response with custom status.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            default_response: Mutex::new(None),
        }
    }

    /// Creates a new mock transport wrapped in an `Arc`.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push(response);
        }
    }

    /// Queues a JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Queues an error response.
    pub fn queue_error(&self, status: u16, detail: &str) {
        self.queue(MockResponse::error(status, detail));
    }

    /// Sets the default response.
    pub fn set_default(&self, response: MockResponse) {
        if let Ok(mut default) = self.default_response.lock() {
            *default = Some(response);
        }
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests
            .lock()
            .ok()
            .and_then(|requests| requests.last().cloned())
    }

    /// Clears recorded requests.
    pub fn clear_requests(&self) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.clear();
        }
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|requests| requests.len()).unwrap_or(0)
    }

    fn get_response(&self) -> MockResponse {
        if let Ok(mut responses) = self.responses.lock() {
            if !responses.is_empty() {
                return responses.remove(0);
            }
        }

        self.default_response
            .lock()
            .ok()
            .and_then(|default| default.clone())
            .unwrap_or_else(|| MockResponse::error(500, "No mock response configured"))
    }

    fn record_request(&self, request: &HttpRequest) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                method: request.method,
                path: request.path.clone(),
                body: request.body.clone(),
                headers: request.headers.clone(),
            });
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.record_request(&request);

        let response = self.get_response();
        Ok(HttpResponse {
            status: response.status,
            headers: response.headers,
            body: response.body,
        })
    }

    async fn send_streaming(
        &self,
        request: HttpRequest,
    ) -> Result<StreamingResponse, TransportError> {
        self.record_request(&request);

        let response = self.get_response();

        let body = response.body.clone();
        let head = futures::stream::once(async move { Ok(Bytes::from(body)) });
        let stream: Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>> =
            if response.hang {
                Box::pin(head.chain(futures::stream::pending()))
            } else {
                Box::pin(head)
            };

        Ok(StreamingResponse {
            status: response.status,
            headers: response.headers,
            stream,
        })
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Test fixtures for common response shapes.
pub mod fixtures {
    use crate::types::rephrase::StyleSet;

    /// A style set with distinct per-field values.
    pub fn style_set() -> StyleSet {
        StyleSet {
            professional: "I would appreciate a prompt response.".to_string(),
            casual: "Hey, get back to me soon!".to_string(),
            polite: "Could you kindly reply when you have a moment?".to_string(),
            social_media: "hit me back! #waiting".to_string(),
        }
    }

    /// The fixture style set as the service's flat JSON document.
    pub fn style_document() -> String {
        serde_json::to_string(&style_set()).unwrap_or_default()
    }

    /// Splits a document into frame payloads of at most `width` chars.
    pub fn split_payloads(document: &str, width: usize) -> Vec<String> {
        let chars: Vec<char> = document.chars().collect();
        chars
            .chunks(width)
            .map(|slice| slice.iter().collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_mock_transport_queue() {
        let transport = MockTransport::new();
        transport.queue_json(&serde_json::json!({"status": "healthy"}));

        let request = HttpRequest::get("health");
        let response = transport.send(request).await.unwrap();

        assert_eq!(response.status, 200);
        assert!(String::from_utf8_lossy(&response.body).contains("healthy"));
    }

    #[tokio::test]
    async fn test_mock_transport_records_requests() {
        let transport = MockTransport::new();
        transport.set_default(MockResponse::json(&serde_json::json!({})));

        transport.send(HttpRequest::get("health")).await.unwrap();
        transport.send(HttpRequest::post("rephrase")).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, "health");
        assert_eq!(requests[1].path, "rephrase");
    }

    #[tokio::test]
    async fn test_mock_transport_error_response() {
        let transport = MockTransport::new();
        transport.queue_error(429, "Rate limit exceeded. Please try again later.");

        let request = HttpRequest::post("rephrase");
        let response = transport.send(request).await.unwrap();

        assert_eq!(response.status, 429);
        assert!(String::from_utf8_lossy(&response.body).contains("detail"));
    }

    #[tokio::test]
    async fn test_mock_stream_response_frames_payloads() {
        let transport = MockTransport::new();
        transport.queue(MockResponse::stream(&["{\"profess", "ional\": \"Hi\"}"]));

        let response = transport
            .send_streaming(HttpRequest::post("rephrase-stream"))
            .await
            .unwrap();

        let chunks: Vec<_> = response.stream.collect().await;
        let text: String = chunks
            .into_iter()
            .map(|c| String::from_utf8_lossy(&c.unwrap()).into_owned())
            .collect();

        assert_eq!(
            text,
            "data: {\"profess\n\ndata: ional\": \"Hi\"}\n\n"
        );
    }

    #[test]
    fn test_fixture_document_round_trips() {
        let document = fixtures::style_document();
        let parsed: crate::types::rephrase::StyleSet =
            serde_json::from_str(&document).unwrap();

        assert_eq!(parsed, fixtures::style_set());
    }
}
