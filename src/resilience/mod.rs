//! Resilience layer for the rephrase client.
//!
//! Provides retry with exponential backoff for non-streaming requests.
//! Streaming requests go through [`RetryPolicy::execute_streaming`],
//! which issues the request exactly once: a partially consumed stream
//! cannot be replayed, so stream failures surface directly.

mod retry;

pub use retry::{RetryConfig, RetryPolicy};
