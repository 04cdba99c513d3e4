//! Streaming response type returned by the transport.

use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

use super::TransportError;

/// A streaming HTTP response.
///
/// The body is exposed as a stream of raw byte chunks with no framing
/// applied. Chunk boundaries are arbitrary; decoding into events is the
/// responsibility of [`crate::decode`].
pub struct StreamingResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// The byte stream of the response body.
    pub stream: Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>,
}

impl std::fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
