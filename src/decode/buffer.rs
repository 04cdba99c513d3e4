//! Append-only payload accumulation.

/// The growing document text of one streaming session.
///
/// Payloads are concatenated verbatim with no separators; the buffer
/// never shrinks and is dropped with the session that owns it.
#[derive(Debug, Default)]
pub struct StreamBuffer {
    content: String,
}

impl StreamBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a payload verbatim.
    pub fn append(&mut self, payload: &str) {
        self.content.push_str(payload);
    }

    /// Returns the accumulated text.
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Returns the buffer length in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_concatenates_verbatim() {
        let mut buffer = StreamBuffer::new();

        buffer.append("{\"professional\"");
        buffer.append(": \"Hel");
        buffer.append("lo\"}");

        assert_eq!(buffer.as_str(), "{\"professional\": \"Hello\"}");
    }

    #[test]
    fn test_no_trimming_or_separators() {
        let mut buffer = StreamBuffer::new();

        buffer.append("  a ");
        buffer.append(" b  ");

        assert_eq!(buffer.as_str(), "  a  b  ");
        assert_eq!(buffer.len(), 8);
    }

    #[test]
    fn test_is_empty() {
        let mut buffer = StreamBuffer::new();
        assert!(buffer.is_empty());

        buffer.append("x");
        assert!(!buffer.is_empty());
    }
}
