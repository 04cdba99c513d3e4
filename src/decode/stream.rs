//! The decoded update stream for one streaming request.

use bytes::Bytes;
use futures::Stream;
use pin_project_lite::pin_project;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::{extract_snapshot, FrameDecoder, Snapshot, StreamBuffer};
use crate::errors::RephraseError;
use crate::transport::{StreamingResponse, TransportError};
use crate::types::rephrase::StyleSet;

/// One progress update from a streaming rephrase request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUpdate {
    /// The style values as currently known.
    pub styles: StyleSet,
    /// The raw buffer the styles were derived from.
    pub raw: String,
    /// True once the buffer parsed as a complete JSON document.
    pub complete: bool,
}

pin_project! {
    /// Stream of decoded style updates.
    ///
    /// Wraps the transport byte stream and runs the decode pipeline on
    /// every chunk: frame splitting, buffer accumulation, snapshot
    /// extraction. An update is yielded only when a snapshot could be
    /// derived, so callers always hold the best view so far. Updates
    /// never shorten a field a previous update already delivered;
    /// complete parses are authoritative and replace the snapshot
    /// wholesale.
    pub struct RephraseStream {
        #[pin]
        inner: Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>,
        carry: Vec<u8>,
        decoder: FrameDecoder,
        buffer: StreamBuffer,
        last: StyleSet,
        pending: VecDeque<StreamUpdate>,
        done: bool,
    }
}

impl std::fmt::Debug for RephraseStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RephraseStream")
            .field("carry", &self.carry)
            .field("decoder", &self.decoder)
            .field("buffer", &self.buffer)
            .field("last", &self.last)
            .field("pending", &self.pending)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl RephraseStream {
    /// Creates a stream from a streaming transport response.
    pub fn new(response: StreamingResponse) -> Result<Self, RephraseError> {
        // Verify status code
        if response.status != 200 {
            return Err(RephraseError::Server {
                message: format!("Unexpected status code: {}", response.status),
                status_code: response.status,
            });
        }

        Ok(Self {
            inner: response.stream,
            carry: Vec::new(),
            decoder: FrameDecoder::new(),
            buffer: StreamBuffer::new(),
            last: StyleSet::default(),
            pending: VecDeque::new(),
            done: false,
        })
    }

    /// Returns the raw buffer accumulated so far.
    pub fn buffered(&self) -> &str {
        self.buffer.as_str()
    }

    /// Returns the styles delivered by the most recent update.
    pub fn latest_styles(&self) -> &StyleSet {
        &self.last
    }

    /// Drains the stream and returns the final styles.
    ///
    /// The terminal value is whatever the last update carried; if the
    /// buffer never parses completely, the last partial snapshot stands.
    pub async fn collect(mut self) -> Result<StyleSet, RephraseError> {
        use futures::StreamExt;

        let mut styles = StyleSet::default();
        while let Some(update) = self.next().await {
            styles = update?.styles;
        }
        Ok(styles)
    }
}

/// Merges a fresh snapshot over the previously delivered styles.
///
/// Partial scans must not shrink a field that was already shown; the
/// source document only appends, so a shorter scan result means the
/// scan lost information, not the document. Complete parses replace
/// everything.
fn reconcile(last: &StyleSet, snapshot: Snapshot) -> StyleSet {
    match snapshot {
        Snapshot::Complete(styles) => styles,
        Snapshot::Partial(mut styles) => {
            keep_longer(&mut styles.professional, &last.professional);
            keep_longer(&mut styles.casual, &last.casual);
            keep_longer(&mut styles.polite, &last.polite);
            keep_longer(&mut styles.social_media, &last.social_media);
            styles
        }
    }
}

fn keep_longer(value: &mut String, last: &str) {
    if value.len() < last.len() {
        *value = last.to_string();
    }
}

/// Decodes as much of the carried bytes as form complete UTF-8
/// sequences, holding an incomplete trailing sequence for the next
/// chunk. A byte sequence that can never become valid UTF-8 is an
/// error.
fn decode_chunk(carry: &mut Vec<u8>, bytes: &[u8]) -> Result<String, String> {
    carry.extend_from_slice(bytes);

    match std::str::from_utf8(carry) {
        Ok(text) => {
            let text = text.to_string();
            carry.clear();
            Ok(text)
        }
        Err(err) if err.error_len().is_none() => {
            let valid = err.valid_up_to();
            let text = String::from_utf8_lossy(&carry[..valid]).into_owned();
            carry.drain(..valid);
            Ok(text)
        }
        Err(err) => Err(format!("Invalid UTF-8 in stream: {err}")),
    }
}

impl Stream for RephraseStream {
    type Item = Result<StreamUpdate, RephraseError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if let Some(update) = this.pending.pop_front() {
            return Poll::Ready(Some(Ok(update)));
        }

        if *this.done {
            return Poll::Ready(None);
        }

        match this.inner.poll_next(cx) {
            Poll::Ready(Some(Ok(bytes))) => {
                let text = match decode_chunk(this.carry, &bytes) {
                    Ok(text) => text,
                    Err(message) => {
                        *this.done = true;
                        return Poll::Ready(Some(Err(RephraseError::Stream {
                            message,
                            partial: Some(this.buffer.as_str().to_string()),
                        })));
                    }
                };

                for payload in this.decoder.push(&text) {
                    this.buffer.append(&payload);

                    if let Some(snapshot) = extract_snapshot(this.buffer.as_str()) {
                        let complete = snapshot.is_complete();
                        let styles = reconcile(this.last, snapshot);
                        *this.last = styles.clone();
                        this.pending.push_back(StreamUpdate {
                            styles,
                            raw: this.buffer.as_str().to_string(),
                            complete,
                        });
                    }
                }

                if let Some(update) = this.pending.pop_front() {
                    return Poll::Ready(Some(Ok(update)));
                }

                // No update from this chunk, poll again
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            Poll::Ready(Some(Err(e))) => {
                *this.done = true;
                let error = match e {
                    TransportError::Timeout { timeout } => RephraseError::Timeout {
                        message: format!("Stream timed out after {timeout:?}"),
                    },
                    other => RephraseError::Network {
                        message: other.to_string(),
                    },
                };
                Poll::Ready(Some(Err(error)))
            }
            Poll::Ready(None) => {
                *this.done = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
