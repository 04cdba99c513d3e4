//! Line framing for the event stream.

/// Literal prefix of a data-bearing line.
const DATA_PREFIX: &str = "data: ";

/// Splits transport text into data payloads.
///
/// The service emits line-oriented frames where data-bearing lines begin
/// with the 6-character prefix `data: `. Line boundaries carry no
/// relation to chunk boundaries, so an incomplete trailing line is held
/// back until the next chunk completes it. A decoder serves exactly one
/// stream; it is not restartable.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    remainder: String,
}

impl FrameDecoder {
    /// Creates a new frame decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one chunk of stream text and returns the payloads of any
    /// data lines it completed.
    ///
    /// Lines without the data prefix (comments, keepalives, event
    /// separators) are discarded, as are payloads consisting only of
    /// whitespace. Returned payloads are verbatim, untrimmed. An
    /// incomplete line left at end-of-stream is never emitted.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.remainder.push_str(chunk);
        let mut payloads = Vec::new();

        while let Some(newline_pos) = self.remainder.find('\n') {
            let line = self.remainder[..newline_pos]
                .trim_end_matches('\r')
                .to_string();
            self.remainder = self.remainder[newline_pos + 1..].to_string();

            if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
                if !payload.trim().is_empty() {
                    payloads.push(payload.to_string());
                }
            }
        }

        payloads
    }
}
