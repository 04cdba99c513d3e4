//! Type definitions for the rephrase API.
//!
//! Provides the request and response types for the rewriting service:
//! the four-field style set, the rephrase request, and the meta endpoint
//! responses.

/// Rephrase request and response types.
pub mod rephrase;
