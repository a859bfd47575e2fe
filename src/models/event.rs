//! Sales event model
//!
//! A `SalesEvent` is one business occurrence as published on the sales
//! topic. The service never interprets its fields: `id` is not a dedup key,
//! `amount` carries no currency and `timestamp` is kept as received.

use serde::{Deserialize, Deserializer, Serialize};

/// One decoded sales event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesEvent {
    /// External identifier, uniqueness is not enforced
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,

    /// Product label
    #[serde(deserialize_with = "null_as_default")]
    pub product: String,

    /// Region label
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,

    /// Monetary amount, unit-less
    #[serde(deserialize_with = "null_as_default")]
    pub amount: f64,

    /// ISO-8601-like timestamp, not parsed
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
}

impl SalesEvent {
    /// Create a new sales event
    pub fn new(
        id: impl Into<String>,
        product: impl Into<String>,
        region: impl Into<String>,
        amount: f64,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            product: product.into(),
            region: region.into(),
            amount,
            timestamp: timestamp.into(),
        }
    }
}

/// Treat an explicit JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_fields_in_declaration_order() {
        let event = SalesEvent::new("1", "Widget", "US", 9.99, "2024-01-01T00:00:00Z");
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"id":"1","product":"Widget","region":"US","amount":9.99,"timestamp":"2024-01-01T00:00:00Z"}"#
        );
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let event: SalesEvent =
            serde_json::from_str(r#"{"id":"7","product":null,"extra":true}"#).unwrap();
        assert_eq!(event.id, "7");
        assert_eq!(event.product, "");
        assert_eq!(event.region, "");
        assert_eq!(event.amount, 0.0);
        assert_eq!(event.timestamp, "");
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let result = serde_json::from_str::<SalesEvent>(r#"{"id":"1","amount":"9.99"}"#);
        assert!(result.is_err());
    }
}
