//! Test utilities for salesfeed
//!
//! This module provides an in-memory message source and event fixtures for
//! exercising the consumer without a broker.

use async_trait::async_trait;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use std::collections::VecDeque;

use crate::kafka::{KafkaIntegrationError, MessageSource, SourceMessage};
use crate::models::SalesEvent;

/// One scripted read result
#[derive(Debug, Clone)]
enum Step {
    Message(Vec<u8>),
    TransportError,
}

/// Message source replaying a fixed script, then reporting exhaustion
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    topic: String,
    partition: i32,
    steps: VecDeque<Step>,
    next_offset: i64,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSource {
    /// Create an empty script on partition 0 of `sales`
    pub fn new() -> Self {
        Self::on_partition(0)
    }

    /// Create an empty script on the given partition
    pub fn on_partition(partition: i32) -> Self {
        Self {
            topic: "sales".to_string(),
            partition,
            steps: VecDeque::new(),
            next_offset: 0,
        }
    }

    /// Deliver a message with this payload
    pub fn message(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.steps.push_back(Step::Message(payload.into()));
        self
    }

    /// Deliver one message per payload
    pub fn messages<I, P>(self, payloads: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Vec<u8>>,
    {
        payloads.into_iter().fold(self, Self::message)
    }

    /// Fail the next read with a transport error
    pub fn transport_error(mut self) -> Self {
        self.steps.push_back(Step::TransportError);
        self
    }

    /// Number of steps left to replay
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

#[async_trait]
impl MessageSource for ScriptedSource {
    async fn next_message(&mut self) -> Option<Result<SourceMessage, KafkaIntegrationError>> {
        let step = self.steps.pop_front()?;
        let result = match step {
            Step::Message(payload) => {
                let offset = self.next_offset;
                self.next_offset += 1;
                Ok(SourceMessage {
                    topic: self.topic.clone(),
                    partition: self.partition,
                    offset,
                    payload,
                })
            },
            Step::TransportError => Err(KafkaIntegrationError::ConnectionError(
                KafkaError::MessageConsumption(RDKafkaErrorCode::BrokerTransportFailure),
            )),
        };
        Some(result)
    }
}

/// Sample event with the given id
pub fn sample_event(id: &str) -> SalesEvent {
    SalesEvent::new(id, "Laptop", "North", 999.99, "2024-01-01T00:00:00Z")
}

/// JSON payload of `sample_event(id)`
pub fn sales_payload(id: &str) -> Vec<u8> {
    serde_json::to_vec(&sample_event(id)).expect("sales events always serialize")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_source_replays_in_order() {
        let mut source = ScriptedSource::on_partition(3)
            .message(sales_payload("a"))
            .transport_error()
            .messages(vec![sales_payload("b")]);
        assert_eq!(source.remaining(), 3);

        let first = source.next_message().await.unwrap().unwrap();
        assert_eq!(first.partition, 3);
        assert_eq!(first.offset, 0);
        assert!(source.next_message().await.unwrap().is_err());
        let second = source.next_message().await.unwrap().unwrap();
        assert_eq!(second.offset, 1);
        assert!(source.next_message().await.is_none());
    }
}
