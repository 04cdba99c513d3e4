//! Rephrase Client Library
//!
//! A production-ready Rust client for the AI Writing Style Assistant
//! API with incremental streaming decode.
//!
//! # Features
//!
//! - **Four style variants**: professional, casual, polite, and
//!   social media rewrites from a single request
//! - **Incremental streaming**: partial style values surface as soon
//!   as the model emits them, with monotonically growing text
//! - **Session control**: one-at-a-time runs with silent cancellation
//! - **Resilience**: exponential-backoff retries for non-streaming
//!   requests, honoring server `Retry-After` hints
//! - **Typed errors**: a full error taxonomy from transport failures
//!   to rate limits
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rephrase_client::{RephraseClient, RephraseRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RephraseClient::builder()
//!         .base_url("http://localhost:8000/api/v1")
//!         .build()?;
//!
//!     let styles = client
//!         .rephrase()
//!         .create(RephraseRequest::new("hey can u send me the report"))
//!         .await?;
//!
//!     println!("professional: {}", styles.professional);
//!     println!("casual:       {}", styles.casual);
//!     Ok(())
//! }
//! ```
//!
//! # Streaming
//!
//! [`RephraseStream`] yields a [`StreamUpdate`] for every decoded
//! snapshot; each update's style values are at least as long as the
//! previous one's.
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use rephrase_client::{RephraseClient, RephraseRequest};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RephraseClient::new()?;
//! let mut stream = client
//!     .rephrase()
//!     .create_stream(RephraseRequest::new("hey can u send me the report"))
//!     .await?;
//!
//! while let Some(update) = stream.next().await {
//!     let update = update?;
//!     print!("\r{}", update.styles.professional);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Sessions
//!
//! A [`StreamSession`] adds lifecycle control on top of the stream:
//! re-entrancy rejection, phase reporting, and cancellation that never
//! delivers another update.
//!
//! ```rust,no_run
//! use rephrase_client::{RephraseClient, RephraseRequest, SessionOutcome};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RephraseClient::new()?;
//! let session = client.session();
//!
//! let outcome = session
//!     .run(RephraseRequest::new("hey can u send me the report"), |update| {
//!         println!("casual so far: {}", update.styles.casual);
//!     })
//!     .await?;
//!
//! if let SessionOutcome::Completed { styles, .. } = outcome {
//!     println!("final: {}", styles.casual);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Client implementation and builder.
pub mod client;
/// Configuration for the client.
pub mod config;
/// Incremental decoding of streaming responses.
pub mod decode;
/// Error types for the library.
pub mod errors;
/// Resilience patterns for reliability.
pub mod resilience;
/// API service implementations.
pub mod services;
/// Streaming session lifecycle management.
pub mod session;
/// HTTP transport layer.
pub mod transport;
/// Request and response types.
pub mod types;

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use client::{RephraseClient, RephraseClientBuilder};
pub use config::{RephraseConfig, RephraseConfigBuilder};
pub use decode::{extract_snapshot, FrameDecoder, RephraseStream, Snapshot, StreamBuffer, StreamUpdate};
pub use errors::{RephraseError, RephraseResult};
pub use resilience::{RetryConfig, RetryPolicy};
pub use services::{HealthService, RephraseService};
pub use session::{SessionOutcome, SessionPhase, StreamSession};
pub use types::rephrase::{HealthStatus, RephraseRequest, StyleSet, VersionInfo};
