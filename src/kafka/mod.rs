//! Kafka integration module for event streaming
//!
//! This module provides:
//! - A `MessageSource` abstraction over the broker subscription
//! - The perpetual consumer loop feeding the event store
//! - Pluggable retry policies for transport errors
//! - A producer for publishing sample sales events

mod consumer;
mod processor;
mod producer;
mod retry;
mod source;

pub use consumer::{ConsumerStats, EventConsumer};
pub use processor::MessageProcessor;
pub use producer::{SalesEventGenerator, SalesProducer};
pub use retry::{ContinueImmediately, ExponentialRetry, RetryPolicy};
pub use source::KafkaSource;

use async_trait::async_trait;
use rdkafka::error::KafkaError;
use rdkafka::message::Message;
use thiserror::Error;

use crate::models::{DecodeError, SalesEvent};

/// Kafka-specific error types
#[derive(Debug, Error)]
pub enum KafkaIntegrationError {
    #[error("Kafka connection error: {0}")]
    ConnectionError(#[from] KafkaError),

    #[error("Subscription failed: {0}")]
    SubscriptionError(String),

    #[error("Publish failed: {0}")]
    PublishError(String),
}

impl From<KafkaIntegrationError> for crate::error::Error {
    fn from(err: KafkaIntegrationError) -> Self {
        crate::error::Error::kafka(err.to_string())
    }
}

/// A message read from the subscription, detached from the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// Message value, empty when the message carried none
    pub payload: Vec<u8>,
}

impl SourceMessage {
    /// Copy the relevant parts of a client message
    pub fn from_message<M: Message>(message: &M) -> Self {
        Self {
            topic: message.topic().to_string(),
            partition: message.partition(),
            offset: message.offset(),
            payload: message.payload().map(<[u8]>::to_vec).unwrap_or_default(),
        }
    }
}

/// Outcome of processing one message
#[derive(Debug)]
pub enum ProcessingResult {
    /// Message decoded and appended to the store
    Accepted(SalesEvent),

    /// Message could not be decoded and was discarded
    Rejected(DecodeError),
}

/// Source of messages for the consumer loop
///
/// `next_message` is the loop's only suspension point while idle. `None`
/// means the source is exhausted; the Kafka source never returns it.
#[async_trait]
pub trait MessageSource: Send {
    async fn next_message(&mut self) -> Option<Result<SourceMessage, KafkaIntegrationError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdkafka::message::{OwnedMessage, Timestamp};

    #[test]
    fn test_source_message_from_owned_message() {
        let owned = OwnedMessage::new(
            Some(b"{}".to_vec()),
            None,
            "sales".to_string(),
            Timestamp::NotAvailable,
            2,
            41,
            None,
        );

        let message = SourceMessage::from_message(&owned);
        assert_eq!(message.topic, "sales");
        assert_eq!(message.partition, 2);
        assert_eq!(message.offset, 41);
        assert_eq!(message.payload, b"{}");
    }

    #[test]
    fn test_missing_payload_becomes_empty() {
        let owned = OwnedMessage::new(
            None,
            None,
            "sales".to_string(),
            Timestamp::NotAvailable,
            0,
            0,
            None,
        );

        assert!(SourceMessage::from_message(&owned).payload.is_empty());
    }

    #[test]
    fn test_kafka_error_converts_to_application_error() {
        let err = KafkaIntegrationError::SubscriptionError("no such topic".to_string());
        let app: crate::error::Error = err.into();
        assert!(matches!(app, crate::error::Error::Kafka(_)));
    }
}
