//! Best-effort extraction of style values from the stream buffer.

use serde_json::Value;

use crate::types::rephrase::StyleSet;

/// A point-in-time view of the four style fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// The whole buffer parsed as JSON; values are authoritative.
    Complete(StyleSet),
    /// Recovered from a syntactically incomplete buffer by field
    /// scanning; values are a best-effort prefix of the final ones.
    Partial(StyleSet),
}

impl Snapshot {
    /// Returns the styles carried by this snapshot.
    pub fn styles(&self) -> &StyleSet {
        match self {
            Snapshot::Complete(styles) | Snapshot::Partial(styles) => styles,
        }
    }

    /// Consumes the snapshot, returning its styles.
    pub fn into_styles(self) -> StyleSet {
        match self {
            Snapshot::Complete(styles) | Snapshot::Partial(styles) => styles,
        }
    }

    /// Returns true for snapshots produced by a full parse.
    pub fn is_complete(&self) -> bool {
        matches!(self, Snapshot::Complete(_))
    }
}

/// Derives the most complete snapshot the buffer currently supports.
///
/// A strict JSON parse of the whole buffer is attempted first; on
/// success the four fields are read with empty-string defaults for
/// anything absent or non-string. While the document is still
/// mid-stream the strict parse fails and each field is scanned for
/// independently instead. Returns `None` when no field can be recovered
/// yet, in which case the caller keeps its previous snapshot.
pub fn extract_snapshot(buffer: &str) -> Option<Snapshot> {
    if let Ok(value) = serde_json::from_str::<Value>(buffer) {
        return Some(Snapshot::Complete(StyleSet {
            professional: field_from_json(&value, "professional"),
            casual: field_from_json(&value, "casual"),
            polite: field_from_json(&value, "polite"),
            social_media: field_from_json(&value, "social_media"),
        }));
    }

    let mut styles = StyleSet::default();
    let mut found = false;

    if let Some(value) = scan_field(buffer, "professional") {
        styles.professional = value.to_string();
        found = true;
    }
    if let Some(value) = scan_field(buffer, "casual") {
        styles.casual = value.to_string();
        found = true;
    }
    if let Some(value) = scan_field(buffer, "polite") {
        styles.polite = value.to_string();
        found = true;
    }
    if let Some(value) = scan_field(buffer, "social_media") {
        styles.social_media = value.to_string();
        found = true;
    }

    found.then_some(Snapshot::Partial(styles))
}

fn field_from_json(value: &Value, name: &str) -> String {
    value
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Scans for one field's partial value.
///
/// Locates `"<name>":`, skips whitespace, and requires the opening value
/// quote; the value is everything up to the next quote or the end of the
/// buffer. Escape sequences are kept as-is, so a `\"` inside the value
/// terminates the capture early. This is an accepted approximation: the
/// strict parse supersedes it once the document completes.
fn scan_field<'a>(buffer: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("\"{name}\":");
    let mut from = 0;

    while let Some(pos) = buffer[from..].find(&needle) {
        let after = from + pos + needle.len();
        let rest = buffer[after..].trim_start();

        if let Some(value) = rest.strip_prefix('"') {
            let end = value.find('"').unwrap_or(value.len());
            return Some(&value[..end]);
        }

        from = after;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_complete_object() {
        let buffer = r#"{"professional":"Hi","casual":"Yo","polite":"Hello there","social_media":"hey!"}"#;

        let snapshot = extract_snapshot(buffer).unwrap();

        assert!(snapshot.is_complete());
        assert_eq!(
            snapshot.into_styles(),
            StyleSet {
                professional: "Hi".to_string(),
                casual: "Yo".to_string(),
                polite: "Hello there".to_string(),
                social_media: "hey!".to_string(),
            }
        );
    }

    #[test]
    fn test_complete_object_missing_field_defaults_empty() {
        let buffer = r#"{"professional": "Hi"}"#;

        let snapshot = extract_snapshot(buffer).unwrap();

        assert!(snapshot.is_complete());
        let styles = snapshot.into_styles();
        assert_eq!(styles.professional, "Hi");
        assert_eq!(styles.casual, "");
        assert_eq!(styles.polite, "");
        assert_eq!(styles.social_media, "");
    }

    #[test]
    fn test_complete_object_non_string_field_defaults_empty() {
        let buffer = r#"{"professional": 42, "casual": "Yo"}"#;

        let styles = extract_snapshot(buffer).unwrap().into_styles();

        assert_eq!(styles.professional, "");
        assert_eq!(styles.casual, "Yo");
    }

    #[test]
    fn test_complete_parse_unescapes_values() {
        let buffer = r#"{"professional": "say \"hi\" now", "casual": "a\nb"}"#;

        let styles = extract_snapshot(buffer).unwrap().into_styles();

        assert_eq!(styles.professional, "say \"hi\" now");
        assert_eq!(styles.casual, "a\nb");
    }

    #[test]
    fn test_non_object_root_yields_empty_complete() {
        let snapshot = extract_snapshot("42").unwrap();

        assert!(snapshot.is_complete());
        assert!(snapshot.styles().is_empty());
    }

    #[test]
    fn test_unterminated_value_recovered_partially() {
        let buffer = r#"{"professional": "Hello"#;

        let snapshot = extract_snapshot(buffer).unwrap();

        assert!(!snapshot.is_complete());
        let styles = snapshot.into_styles();
        assert_eq!(styles.professional, "Hello");
        assert_eq!(styles.casual, "");
        assert_eq!(styles.polite, "");
        assert_eq!(styles.social_media, "");
    }

    #[test]
    fn test_multiple_fields_recovered() {
        let buffer = r#"{"professional": "Hi", "casual": "Yo, what"#;

        let styles = extract_snapshot(buffer).unwrap().into_styles();

        assert_eq!(styles.professional, "Hi");
        assert_eq!(styles.casual, "Yo, what");
        assert_eq!(styles.polite, "");
    }

    #[test]
    fn test_opening_value_quote_counts_as_found() {
        let buffer = r#"{"professional": ""#;

        let snapshot = extract_snapshot(buffer).unwrap();

        assert!(!snapshot.is_complete());
        assert_eq!(snapshot.styles().professional, "");
    }

    #[test]
    fn test_field_without_value_quote_not_found() {
        assert_eq!(extract_snapshot(r#"{"professional":"#), None);
        assert_eq!(extract_snapshot(r#"{"professional": 4"#), None);
    }

    #[test]
    fn test_nothing_recoverable_returns_none() {
        assert_eq!(extract_snapshot("{"), None);
        assert_eq!(extract_snapshot(r#"{"prof"#), None);
        assert_eq!(extract_snapshot(""), None);
    }

    #[test]
    fn test_whitespace_allowed_between_colon_and_quote() {
        let buffer = "{\"professional\":   \"Hi";

        let styles = extract_snapshot(buffer).unwrap().into_styles();

        assert_eq!(styles.professional, "Hi");
    }

    #[test]
    fn test_no_whitespace_allowed_before_colon() {
        assert_eq!(extract_snapshot("{\"professional\" : \"Hi"), None);
    }

    #[test]
    fn test_partial_value_stops_at_escaped_quote() {
        // Known approximation: the scan cannot tell \" from a closing
        // quote, so the partial value is truncated until the strict
        // parse takes over.
        let buffer = r#"{"professional": "say \"hi"#;

        let styles = extract_snapshot(buffer).unwrap().into_styles();

        assert_eq!(styles.professional, "say \\");
    }

    #[test]
    fn test_partial_keeps_escape_sequences_raw() {
        let buffer = r#"{"casual": "a\nb"#;

        let styles = extract_snapshot(buffer).unwrap().into_styles();

        assert_eq!(styles.casual, "a\\nb");
    }

    #[test]
    fn test_partial_value_grows_with_buffer() {
        let full = r#"{"professional": "Hello there friend"#;

        let mut previous = String::new();
        for end in 0..=full.len() {
            if let Some(snapshot) = extract_snapshot(&full[..end]) {
                let value = snapshot.into_styles().professional;
                assert!(
                    value.starts_with(&previous),
                    "value {value:?} no longer starts with {previous:?}"
                );
                previous = value;
            }
        }

        assert_eq!(previous, "Hello there friend");
    }
}
