//! Kafka-backed message source

use anyhow::anyhow;
use async_trait::async_trait;
use rdkafka::consumer::{Consumer, StreamConsumer};
use tracing::info;

use super::{KafkaIntegrationError, MessageSource, SourceMessage};
use crate::config::KafkaConfig;
use crate::error::Result;

/// Subscription to the sales topic under the configured consumer group
pub struct KafkaSource {
    consumer: StreamConsumer,
}

impl KafkaSource {
    /// Create the consumer and subscribe to the configured topic
    pub fn new(config: &KafkaConfig) -> Result<Self> {
        let consumer: StreamConsumer = config
            .build_consumer_config()
            .create()
            .map_err(|e| anyhow!("Failed to create Kafka consumer: {}", e))?;

        consumer
            .subscribe(&[config.topic.as_str()])
            .map_err(|e| KafkaIntegrationError::SubscriptionError(e.to_string()))?;

        info!(
            topic = %config.topic,
            group_id = %config.group_id,
            "Subscribed to Kafka topic"
        );

        Ok(Self { consumer })
    }
}

#[async_trait]
impl MessageSource for KafkaSource {
    async fn next_message(
        &mut self,
    ) -> Option<std::result::Result<SourceMessage, KafkaIntegrationError>> {
        let message = self
            .consumer
            .recv()
            .await
            .map(|message| SourceMessage::from_message(&message))
            .map_err(KafkaIntegrationError::from);
        Some(message)
    }
}
