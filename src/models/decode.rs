//! Payload decoding
//!
//! Turns the raw value of a Kafka message into a `SalesEvent`. Decoding is
//! permissive about the shape of the object: unknown fields are ignored,
//! missing fields are zeroed, keys match field names regardless of case and
//! invalid UTF-8 is replaced with U+FFFD. A `null` document is an all-zero
//! event. Anything else must be a JSON object with correctly typed fields.

use serde_json::{Map, Value};

use super::error::{DecodeError, DecodeErrorKind};
use super::event::SalesEvent;

/// Field names of the wire format
const FIELD_NAMES: [&str; 5] = ["id", "product", "region", "amount", "timestamp"];

/// Decode a message payload into a sales event
pub fn decode(payload: &[u8]) -> Result<SalesEvent, DecodeError> {
    let text = String::from_utf8_lossy(payload);
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| DecodeError::new(DecodeErrorKind::Malformed, e.to_string(), payload))?;

    match value {
        Value::Null => Ok(SalesEvent::default()),
        Value::Object(object) => serde_json::from_value(Value::Object(canonical_keys(object)))
            .map_err(|e| DecodeError::new(DecodeErrorKind::FieldType, e.to_string(), payload)),
        other => Err(DecodeError::new(
            DecodeErrorKind::NotAnObject,
            format!("found {}", json_type(&other)),
            payload,
        )),
    }
}

/// Rename keys onto the field names they match case-insensitively
///
/// An exact key wins over a case-folded one; among several case-folded keys
/// the one sorting first wins. Keys matching no field are dropped.
fn canonical_keys(object: Map<String, Value>) -> Map<String, Value> {
    let mut canonical = Map::new();
    let mut folded = Vec::new();

    for (key, value) in object {
        if FIELD_NAMES.contains(&key.as_str()) {
            canonical.insert(key, value);
        } else if let Some(name) = FIELD_NAMES.iter().find(|name| name.eq_ignore_ascii_case(&key)) {
            folded.push((*name, value));
        }
    }

    for (name, value) in folded {
        canonical.entry(name).or_insert(value);
    }
    canonical
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
