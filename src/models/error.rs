//! Decode error types
//!
//! A decode failure is terminal for the message that caused it: the consumer
//! logs it and moves on. The error keeps a preview of the raw payload so the
//! log line shows what was discarded.

use std::fmt;

/// Longest payload preview kept on an error, in bytes
pub const PAYLOAD_PREVIEW_LIMIT: usize = 256;

/// Kinds of decode failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Payload is not well-formed JSON
    Malformed,
    /// Payload is JSON but its top level is neither an object nor null
    NotAnObject,
    /// A field is present with the wrong JSON type
    FieldType,
}

impl DecodeErrorKind {
    /// Short machine-readable name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeErrorKind::Malformed => "malformed",
            DecodeErrorKind::NotAnObject => "not_an_object",
            DecodeErrorKind::FieldType => "field_type",
        }
    }
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::Malformed => write!(f, "Malformed payload"),
            DecodeErrorKind::NotAnObject => write!(f, "Payload is not a JSON object"),
            DecodeErrorKind::FieldType => write!(f, "Field has the wrong type"),
        }
    }
}

/// A payload that could not be turned into a sales event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// What went wrong
    pub kind: DecodeErrorKind,
    /// Parser diagnostic
    pub detail: String,
    /// Lossy UTF-8 preview of the payload, capped at `PAYLOAD_PREVIEW_LIMIT`
    pub payload: String,
}

impl DecodeError {
    /// Create a decode error, capturing a preview of `payload`
    pub fn new(kind: DecodeErrorKind, detail: impl Into<String>, payload: &[u8]) -> Self {
        Self {
            kind,
            detail: detail.into(),
            payload: preview(payload),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

impl std::error::Error for DecodeError {}

fn preview(payload: &[u8]) -> String {
    if payload.len() <= PAYLOAD_PREVIEW_LIMIT {
        return String::from_utf8_lossy(payload).into_owned();
    }
    let mut text = String::from_utf8_lossy(&payload[..PAYLOAD_PREVIEW_LIMIT]).into_owned();
    text.push_str("...");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_detail() {
        let error = DecodeError::new(DecodeErrorKind::Malformed, "expected value", b"not-json");
        let display = error.to_string();
        assert!(display.contains("Malformed payload"));
        assert!(display.contains("expected value"));
        assert_eq!(error.payload, "not-json");
    }

    #[test]
    fn test_payload_preview_is_capped() {
        let payload = vec![b'x'; PAYLOAD_PREVIEW_LIMIT * 2];
        let error = DecodeError::new(DecodeErrorKind::Malformed, "too long", &payload);
        assert_eq!(error.payload.len(), PAYLOAD_PREVIEW_LIMIT + 3);
        assert!(error.payload.ends_with("..."));
    }

    #[test]
    fn test_invalid_utf8_preview_is_lossy() {
        let error = DecodeError::new(DecodeErrorKind::Malformed, "bad utf-8", &[0xff, b'a']);
        assert_eq!(error.payload, "\u{fffd}a");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(DecodeErrorKind::Malformed.as_str(), "malformed");
        assert_eq!(DecodeErrorKind::NotAnObject.as_str(), "not_an_object");
        assert_eq!(DecodeErrorKind::FieldType.as_str(), "field_type");
    }
}
