//! Service implementations for the rephrase API.
//!
//! Provides the rephrase service for style rewriting (single-shot and
//! streaming) and the health service for service status endpoints.
//! Both map failures through the same error ladder: transport faults
//! via [`transport_error`], non-success responses via
//! [`response_error`].

use std::collections::HashMap;
use std::time::Duration;

mod health;
mod rephrase;

pub use health::HealthService;
pub use rephrase::RephraseService;

use crate::errors::{ApiErrorBody, RephraseError};
use crate::transport::{HttpResponse, TransportError};

/// Maps a transport failure onto the client error taxonomy.
pub(crate) fn transport_error(err: TransportError) -> RephraseError {
    match err {
        TransportError::Timeout { timeout } => RephraseError::Timeout {
            message: format!("Request timed out after {timeout:?}"),
        },
        other => RephraseError::Network {
            message: other.to_string(),
        },
    }
}

/// Maps a non-success response, preferring the service's error body
/// when one parses.
pub(crate) fn response_error(response: &HttpResponse) -> RephraseError {
    match serde_json::from_slice::<ApiErrorBody>(&response.body) {
        Ok(body) => map_error(
            response.status,
            body,
            retry_after_header(&response.headers),
        ),
        Err(_) => status_error(response.status, &response.headers),
    }
}

/// Maps an API error body to the internal error type.
pub(crate) fn map_error(
    status: u16,
    body: ApiErrorBody,
    retry_after: Option<Duration>,
) -> RephraseError {
    match status {
        401 => RephraseError::Authentication {
            message: body.detail,
        },
        400 | 422 => RephraseError::Validation {
            message: body.detail,
            param: None,
        },
        429 => RephraseError::RateLimit {
            message: body.detail,
            retry_after,
        },
        500..=599 => RephraseError::Server {
            message: body.detail,
            status_code: status,
        },
        _ => RephraseError::Unknown {
            status,
            message: body.detail,
        },
    }
}

/// Maps a status code when no readable error body is available.
pub(crate) fn status_error(status: u16, headers: &HashMap<String, String>) -> RephraseError {
    match status {
        401 => RephraseError::Authentication {
            message: "Authentication failed".to_string(),
        },
        400 | 422 => RephraseError::Validation {
            message: "Invalid request".to_string(),
            param: None,
        },
        429 => RephraseError::RateLimit {
            message: "Rate limit exceeded".to_string(),
            retry_after: retry_after_header(headers),
        },
        500..=599 => RephraseError::Server {
            message: format!("Server error: {status}"),
            status_code: status,
        },
        _ => RephraseError::Unknown {
            status,
            message: format!("Unexpected status: {status}"),
        },
    }
}

pub(crate) fn retry_after_header(headers: &HashMap<String, String>) -> Option<Duration> {
    headers
        .get("retry-after")
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}
