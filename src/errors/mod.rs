//! Error types for the rephrase client.
//!
//! Provides an error taxonomy covering all failure modes of the client:
//! configuration and validation problems, API rejections, transport
//! failures, and streaming decode errors.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for rephrase operations.
pub type RephraseResult<T> = Result<T, RephraseError>;

/// Comprehensive error type for rephrase client operations.
#[derive(Debug, Error, PartialEq)]
pub enum RephraseError {
    /// Configuration error (invalid base URL, missing settings, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// Validation error (request validation failed, locally or server-side).
    #[error("Validation error: {message}")]
    Validation {
        /// Error message describing the validation issue.
        message: String,
        /// The parameter that caused the error.
        param: Option<String>,
    },

    /// Authentication error (rejected or missing credentials).
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Error message from the API.
        message: String,
    },

    /// Invalid session state (an operation was called from the wrong phase).
    #[error("Invalid session state: {message}")]
    InvalidState {
        /// Error message naming the offending phase.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        /// Error message.
        message: String,
        /// Duration to wait before retrying.
        retry_after: Option<Duration>,
    },

    /// Server error (5xx status codes).
    #[error("Server error (HTTP {status_code}): {message}")]
    Server {
        /// Error message.
        message: String,
        /// HTTP status code.
        status_code: u16,
    },

    /// Network/connection error.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Request timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Streaming error.
    #[error("Stream error: {message}")]
    Stream {
        /// Error message.
        message: String,
        /// Raw buffer content received before the error.
        partial: Option<String>,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Unknown error.
    #[error("Unknown error (HTTP {status}): {message}")]
    Unknown {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },
}

impl RephraseError {
    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RephraseError::RateLimit { .. }
                | RephraseError::Server { status_code: 500..=504, .. }
                | RephraseError::Timeout { .. }
                | RephraseError::Network { .. }
        )
    }

    /// Returns the retry-after duration if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            RephraseError::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        RephraseError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        RephraseError::Validation {
            message: message.into(),
            param: None,
        }
    }

    /// Creates a validation error with the offending parameter.
    pub fn validation_param(message: impl Into<String>, param: impl Into<String>) -> Self {
        RephraseError::Validation {
            message: message.into(),
            param: Some(param.into()),
        }
    }

    /// Creates an invalid session state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        RephraseError::InvalidState {
            message: message.into(),
        }
    }

    /// Creates a server error.
    pub fn server(status_code: u16, message: impl Into<String>) -> Self {
        RephraseError::Server {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        RephraseError::Network {
            message: message.into(),
        }
    }

    /// Creates a stream error carrying the buffer received so far.
    pub fn stream(message: impl Into<String>, partial: Option<String>) -> Self {
        RephraseError::Stream {
            message: message.into(),
            partial,
        }
    }
}

/// API error response body, as produced by the service.
///
/// The service reports errors as `{"detail": "...", "error_code": ...}`.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable error detail.
    pub detail: String,
    /// Optional machine-readable error code.
    #[serde(default)]
    pub error_code: Option<String>,
}

impl From<reqwest::Error> for RephraseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RephraseError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_connect() {
            RephraseError::Network {
                message: err.to_string(),
            }
        } else {
            RephraseError::Unknown {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for RephraseError {
    fn from(err: serde_json::Error) -> Self {
        RephraseError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for RephraseError {
    fn from(err: url::ParseError) -> Self {
        RephraseError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
