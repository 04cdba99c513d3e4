//! Incremental decode pipeline for streaming responses.
//!
//! The service streams its response as line-oriented `data: ` frames,
//! each carrying the next slice of one growing JSON document. The
//! pipeline turns raw transport chunks into style snapshots in three
//! steps:
//!
//! 1. [`FrameDecoder`] splits chunk text into complete data payloads,
//!    carrying partial lines across chunk boundaries.
//! 2. [`StreamBuffer`] accumulates payloads into the partial document.
//! 3. [`extract_snapshot`] derives the best obtainable
//!    [`StyleSet`](crate::types::rephrase::StyleSet) from the buffer,
//!    degrading to per-field scanning while the document is still
//!    syntactically incomplete.
//!
//! [`RephraseStream`] runs the whole pipeline as a [`futures::Stream`]
//! of [`StreamUpdate`] items.

mod buffer;
mod frame;
mod snapshot;
mod stream;

pub use buffer::StreamBuffer;
pub use frame::FrameDecoder;
pub use snapshot::{extract_snapshot, Snapshot};
pub use stream::{RephraseStream, StreamUpdate};
