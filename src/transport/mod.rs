//! HTTP transport layer for the rephrase client.
//!
//! Provides the HTTP transport abstraction and implementations for
//! making requests to the rephrase service, including streaming support.

mod http;
mod streaming;

pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};
pub use streaming::StreamingResponse;

use std::time::Duration;

/// Transport-level errors that can occur during HTTP operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("Connection failed: {message}")]
    Connection {
        /// Error details.
        message: String,
    },

    /// Request timed out.
    #[error("Request timed out after {timeout:?}")]
    Timeout {
        /// The timeout that was exceeded.
        timeout: Duration,
    },

    /// Invalid response received.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },
}
