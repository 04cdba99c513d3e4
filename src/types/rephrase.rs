//! Request and response types for the rephrase endpoints.

use serde::{Deserialize, Serialize};

use crate::config::MAX_TEXT_LENGTH;
use crate::errors::{RephraseError, RephraseResult};

/// The four style field names, in the order the service emits them.
///
/// Key order is fixed and known in advance; the streaming extractor relies
/// on these exact names appearing as `"key": "..."` in the wire document.
pub const STYLE_FIELDS: [&str; 4] = ["professional", "casual", "polite", "social_media"];

/// The unit of output: four parallel rewrites of the submitted text.
///
/// Missing fields deserialize as empty strings, never as absent. This is
/// also the exact body shape of the non-streaming `rephrase` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSet {
    /// Professional rewrite.
    #[serde(default)]
    pub professional: String,
    /// Casual rewrite.
    #[serde(default)]
    pub casual: String,
    /// Polite rewrite.
    #[serde(default)]
    pub polite: String,
    /// Social-media rewrite.
    #[serde(default)]
    pub social_media: String,
}

impl StyleSet {
    /// Returns true if all four fields are empty.
    pub fn is_empty(&self) -> bool {
        self.professional.is_empty()
            && self.casual.is_empty()
            && self.polite.is_empty()
            && self.social_media.is_empty()
    }

    /// Returns the value of a field by name, or `None` for an unknown name.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "professional" => Some(&self.professional),
            "casual" => Some(&self.casual),
            "polite" => Some(&self.polite),
            "social_media" => Some(&self.social_media),
            _ => None,
        }
    }
}

/// Request body for the rephrase endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RephraseRequest {
    /// Text to rewrite.
    pub text: String,
}

impl RephraseRequest {
    /// Creates a new rephrase request.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Validates the request against the service's input contract.
    ///
    /// The service rejects empty (after trimming) text and text longer than
    /// [`MAX_TEXT_LENGTH`] characters; validating locally avoids a doomed
    /// round trip.
    pub fn validate(&self) -> RephraseResult<()> {
        if self.text.trim().is_empty() {
            return Err(RephraseError::validation_param(
                "Text cannot be empty",
                "text",
            ));
        }

        let length = self.text.chars().count();
        if length > MAX_TEXT_LENGTH {
            return Err(RephraseError::validation_param(
                format!(
                    "Text is {} characters, maximum is {}",
                    length, MAX_TEXT_LENGTH
                ),
                "text",
            ));
        }

        Ok(())
    }
}

/// Response body of the `health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Service status, `"ok"` when healthy.
    pub status: String,
    /// Deployment environment name.
    pub environment: String,
    /// Service version, when reported.
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    /// Returns true if the service reported itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Response body of the `version` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Service version string.
    pub version: String,
    /// API version identifier (e.g. `"v1"`).
    pub api_version: String,
    /// Deployment environment name.
    pub environment: String,
    /// Feature advertisement, passed through as raw JSON.
    #[serde(default)]
    pub features: serde_json::Value,
    /// Whether this API version is deprecated.
    #[serde(default)]
    pub deprecated: bool,
}
