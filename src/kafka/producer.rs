//! Producer for publishing sales events
//!
//! Used by the `sales-producer` binary to feed a topic with sample traffic
//! and by the end-to-end tests.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

use super::KafkaIntegrationError;
use crate::error::{Error, Result};
use crate::models::SalesEvent;

/// Producer sending JSON encoded sales events to one topic
pub struct SalesProducer {
    /// Kafka producer instance
    producer: FutureProducer,

    /// Destination topic
    topic: String,

    /// Timeout for send operations
    send_timeout: Duration,
}

impl SalesProducer {
    /// Create a new sales producer
    pub fn new(config: ClientConfig, topic: impl Into<String>) -> Result<Self> {
        let producer: FutureProducer = config
            .create()
            .map_err(|e| Error::from(KafkaIntegrationError::ConnectionError(e)))?;

        Ok(Self {
            producer,
            topic: topic.into(),
            send_timeout: Duration::from_secs(5),
        })
    }

    /// Topic the producer publishes to
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publish one event, keyed by its id
    pub async fn send(&self, event: &SalesEvent) -> Result<()> {
        let payload = serde_json::to_vec(event)?;
        self.send_raw(&event.id, &payload).await
    }

    /// Publish an arbitrary payload
    pub async fn send_raw(&self, key: &str, payload: &[u8]) -> Result<()> {
        let record = FutureRecord::to(&self.topic).payload(payload).key(key);

        match self.producer.send(record, self.send_timeout).await {
            Ok((partition, offset)) => {
                debug!(
                    topic = %self.topic,
                    partition,
                    offset,
                    "Published message"
                );
                Ok(())
            },
            Err((kafka_error, _)) => {
                error!(
                    topic = %self.topic,
                    error = %kafka_error,
                    "Failed to publish message"
                );
                Err(Error::from(KafkaIntegrationError::PublishError(
                    kafka_error.to_string(),
                )))
            },
        }
    }
}

/// Generates random sales events resembling dashboard traffic
#[derive(Debug, Clone)]
pub struct SalesEventGenerator {
    products: Vec<String>,
    regions: Vec<String>,
    min_amount: f64,
    max_amount: f64,
}

impl Default for SalesEventGenerator {
    fn default() -> Self {
        Self {
            products: ["Laptop", "Smartphone", "Headphones", "Monitor", "Keyboard"]
                .map(String::from)
                .to_vec(),
            regions: ["North", "South", "East", "West"].map(String::from).to_vec(),
            min_amount: 50.0,
            max_amount: 1500.0,
        }
    }
}

impl SalesEventGenerator {
    /// Generate one event stamped with `now`
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> SalesEvent {
        let amount = rng.gen_range(self.min_amount..=self.max_amount);

        SalesEvent {
            id: Uuid::new_v4().to_string(),
            product: self.products.choose(rng).cloned().unwrap_or_default(),
            region: self.regions.choose(rng).cloned().unwrap_or_default(),
            amount: (amount * 100.0).round() / 100.0,
            timestamp: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
    }
}
