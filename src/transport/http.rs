//! HTTP transport implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::instrument;

use super::{StreamingResponse, TransportError};

/// HTTP method for requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method.
    Get,
    /// HTTP POST method.
    Post,
}

/// An HTTP request to be sent by the transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path (relative to base URL).
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Request timeout override.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Creates a new GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Creates a new POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header to the request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets a timeout override for this request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// An HTTP response from the transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true if the status code indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserializes the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_slice(&self.body).map_err(|e| TransportError::InvalidResponse {
            message: format!("JSON deserialization failed: {e}"),
        })
    }
}

/// Abstraction over HTTP operations, enabling mock implementations for
/// testing.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends an HTTP request and returns the response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Sends an HTTP request and returns a streaming response.
    async fn send_streaming(
        &self,
        request: HttpRequest,
    ) -> Result<StreamingResponse, TransportError>;
}

/// Production HTTP transport backed by `reqwest`.
pub struct HttpTransportImpl {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransportImpl {
    /// Creates a new HTTP transport.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| TransportError::Connection {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn prepare(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let url = self.build_url(&request.path);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder
    }
}

fn map_reqwest_error(err: reqwest::Error, request: &HttpRequest) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            timeout: request.timeout.unwrap_or(Duration::from_secs(60)),
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::InvalidResponse {
            message: err.to_string(),
        }
    }
}

fn collect_headers(response: &reqwest::Response) -> HashMap<String, String> {
    response
        .headers()
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                v.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

#[async_trait]
impl HttpTransport for HttpTransportImpl {
    #[instrument(skip(self, request), fields(method = ?request.method, path = %request.path))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = self.prepare(&request);

        let response = builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, &request))?;

        let status = response.status().as_u16();
        let headers = collect_headers(&response);

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::InvalidResponse {
                message: format!("Failed to read response body: {e}"),
            })?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    #[instrument(skip(self, request), fields(method = ?request.method, path = %request.path))]
    async fn send_streaming(
        &self,
        request: HttpRequest,
    ) -> Result<StreamingResponse, TransportError> {
        let builder = self.prepare(&request);

        let response = builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, &request))?;

        let status = response.status().as_u16();
        let headers = collect_headers(&response);

        let stream = futures::StreamExt::map(response.bytes_stream(), |result| {
            result.map_err(|e| TransportError::Connection {
                message: format!("Stream error: {e}"),
            })
        });

        Ok(StreamingResponse {
            status,
            headers,
            stream: Box::pin(stream),
        })
    }
}

impl std::fmt::Debug for HttpTransportImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportImpl")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_builders() {
        let request = HttpRequest::post("/rephrase")
            .with_header("Content-Type", "application/json")
            .with_body(b"{}".to_vec())
            .with_timeout(Duration::from_secs(5));

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/rephrase");
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(request.body.as_deref(), Some(b"{}".as_slice()));
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_http_response_is_success() {
        let mut response = HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Vec::new(),
        };
        assert!(response.is_success());

        response.status = 299;
        assert!(response.is_success());

        response.status = 404;
        assert!(!response.is_success());

        response.status = 500;
        assert!(!response.is_success());
    }

    #[test]
    fn test_http_response_json() {
        let response = HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: br#"{"status": "healthy", "environment": "test"}"#.to_vec(),
        };

        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["status"], "healthy");

        let bad = HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: b"not json".to_vec(),
        };
        assert!(bad.json::<serde_json::Value>().is_err());
    }

    #[test]
    fn test_build_url_joins_paths() {
        let transport =
            HttpTransportImpl::new("http://localhost:8000/api/v1/", Duration::from_secs(30))
                .unwrap();

        assert_eq!(
            transport.build_url("/rephrase"),
            "http://localhost:8000/api/v1/rephrase"
        );
        assert_eq!(
            transport.build_url("health"),
            "http://localhost:8000/api/v1/health"
        );
    }
}
