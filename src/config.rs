//! Configuration module for salesfeed
//!
//! This module handles loading and validating configuration from environment
//! variables, providing strongly-typed configuration structures for the HTTP
//! server, the Kafka consumer and the in-memory store.

use envconfig::Envconfig;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::kafka::{ContinueImmediately, ExponentialRetry, RetryPolicy};

/// Main configuration structure for salesfeed
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct Config {
    /// Server configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub server: ServerConfig,

    /// Kafka configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub kafka: KafkaConfig,

    /// Consumer loop configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub consumer: ConsumerConfig,

    /// Event store configuration
    #[serde(flatten)]
    #[envconfig(nested)]
    pub store: StoreConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct ServerConfig {
    /// Host to bind to
    #[envconfig(from = "HOST", default = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,

    /// Log level
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    /// Environment (development, staging, production)
    #[envconfig(from = "ENVIRONMENT", default = "development")]
    pub environment: String,

    /// Request timeout in seconds
    #[envconfig(from = "REQUEST_TIMEOUT_SECS", default = "30")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Get the server address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Kafka configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct KafkaConfig {
    /// Kafka brokers (comma-separated)
    #[envconfig(from = "KAFKA_BROKERS", default = "localhost:9092")]
    pub brokers: String,

    /// Consumer group ID
    #[envconfig(from = "KAFKA_GROUP_ID", default = "salesfeed")]
    pub group_id: String,

    /// Topic carrying the sales events
    #[envconfig(from = "KAFKA_TOPIC", default = "sales")]
    pub topic: String,

    /// Auto offset reset (earliest, latest)
    #[envconfig(from = "KAFKA_AUTO_OFFSET_RESET", default = "earliest")]
    pub auto_offset_reset: String,

    /// Session timeout in milliseconds
    #[envconfig(from = "KAFKA_SESSION_TIMEOUT_MS", default = "30000")]
    pub session_timeout_ms: u32,

    /// Enable auto commit
    #[envconfig(from = "KAFKA_ENABLE_AUTO_COMMIT", default = "true")]
    pub enable_auto_commit: bool,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            group_id: "salesfeed".to_string(),
            topic: "sales".to_string(),
            auto_offset_reset: "earliest".to_string(),
            session_timeout_ms: 30000,
            enable_auto_commit: true,
        }
    }
}

impl KafkaConfig {
    /// Get brokers as a vector
    pub fn brokers_list(&self) -> Vec<String> {
        self.brokers
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Build rdkafka consumer configuration
    pub fn build_consumer_config(&self) -> rdkafka::ClientConfig {
        let mut config = rdkafka::ClientConfig::new();

        config
            .set("bootstrap.servers", self.brokers_list().join(","))
            .set("group.id", &self.group_id)
            .set("enable.auto.commit", self.enable_auto_commit.to_string())
            .set("session.timeout.ms", self.session_timeout_ms.to_string())
            .set("auto.offset.reset", &self.auto_offset_reset)
            .set("enable.partition.eof", "false");

        config
    }

    /// Build rdkafka producer configuration for the sample producer
    pub fn build_producer_config(&self) -> rdkafka::ClientConfig {
        let mut config = rdkafka::ClientConfig::new();

        config
            .set("bootstrap.servers", self.brokers_list().join(","))
            .set("message.timeout.ms", "5000")
            .set("acks", "1");

        config
    }
}

/// Consumer loop configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct ConsumerConfig {
    /// Back off exponentially after transport errors instead of retrying at once
    #[envconfig(from = "CONSUMER_RETRY_BACKOFF", default = "false")]
    pub retry_backoff: bool,

    /// First backoff delay in milliseconds
    #[envconfig(from = "CONSUMER_RETRY_INITIAL_MS", default = "100")]
    pub retry_initial_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[envconfig(from = "CONSUMER_RETRY_MAX_MS", default = "10000")]
    pub retry_max_ms: u64,
}

impl ConsumerConfig {
    /// Get the initial retry delay as Duration
    pub fn retry_initial_delay(&self) -> Duration {
        Duration::from_millis(self.retry_initial_ms)
    }

    /// Get the maximum retry delay as Duration
    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_ms)
    }

    /// Build the retry policy applied after transport errors
    pub fn retry_policy(&self) -> Box<dyn RetryPolicy> {
        if self.retry_backoff {
            Box::new(ExponentialRetry::new(
                self.retry_initial_delay(),
                self.retry_max_delay(),
            ))
        } else {
            Box::new(ContinueImmediately)
        }
    }
}

/// Event store configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, Envconfig)]
pub struct StoreConfig {
    /// Keep at most this many events, evicting the oldest (0 keeps everything)
    #[envconfig(from = "STORE_MAX_EVENTS", default = "0")]
    pub max_events: usize,
}

impl StoreConfig {
    /// Capacity of the store, `None` when unbounded
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.max_events)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenv::dotenv().ok();

        Config::init_from_env().map_err(Error::from)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::config("Server port cannot be 0"));
        }

        if self.kafka.brokers_list().is_empty() {
            return Err(Error::config("Kafka brokers cannot be empty"));
        }

        if self.kafka.topic.trim().is_empty() {
            return Err(Error::config("Kafka topic cannot be empty"));
        }

        if self.kafka.group_id.trim().is_empty() {
            return Err(Error::config("Kafka consumer group cannot be empty"));
        }

        if self.consumer.retry_max_ms < self.consumer.retry_initial_ms {
            return Err(Error::config(
                "Consumer retry max delay must not be below the initial delay",
            ));
        }

        Ok(())
    }

    /// Log the effective configuration
    pub fn log_config(&self) {
        tracing::info!(
            server_address = %self.server.address(),
            environment = %self.server.environment,
            log_level = %self.server.log_level,
            request_timeout_secs = %self.server.request_timeout_secs,
            "Server configuration"
        );

        tracing::info!(
            brokers = %self.kafka.brokers,
            group_id = %self.kafka.group_id,
            topic = %self.kafka.topic,
            auto_offset_reset = %self.kafka.auto_offset_reset,
            auto_commit = %self.kafka.enable_auto_commit,
            "Kafka configuration"
        );

        tracing::info!(
            retry_backoff = %self.consumer.retry_backoff,
            retry_initial_ms = %self.consumer.retry_initial_ms,
            retry_max_ms = %self.consumer.retry_max_ms,
            "Consumer configuration"
        );

        match self.store.capacity() {
            Some(capacity) => tracing::info!(
                max_events = capacity.get(),
                "Event store is bounded, oldest events will be evicted"
            ),
            None => tracing::info!("Event store is unbounded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn test_config() -> Config {
        Config::init_from_hashmap(&HashMap::new()).unwrap()
    }

    #[test]
    fn test_defaults_from_empty_environment() {
        let config = test_config();

        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert_eq!(config.kafka.topic, "sales");
        assert_eq!(config.kafka.group_id, "salesfeed");
        assert!(config.kafka.enable_auto_commit);
        assert!(!config.consumer.retry_backoff);
        assert!(config.store.capacity().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_from_environment() {
        let vars: HashMap<String, String> = [
            ("PORT", "9000"),
            ("KAFKA_TOPIC", "sales.v2"),
            ("KAFKA_GROUP_ID", "dashboard"),
            ("STORE_MAX_EVENTS", "500"),
            ("CONSUMER_RETRY_BACKOFF", "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::init_from_hashmap(&vars).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.kafka.topic, "sales.v2");
        assert_eq!(config.kafka.group_id, "dashboard");
        assert_eq!(config.store.capacity().map(NonZeroUsize::get), Some(500));
        assert!(config.consumer.retry_backoff);
    }

    #[test]
    fn test_kafka_brokers_list() {
        let config = KafkaConfig {
            brokers: "broker1:9092, broker2:9092,,broker3:9092".to_string(),
            ..KafkaConfig::default()
        };

        let brokers = config.brokers_list();
        assert_eq!(brokers, vec!["broker1:9092", "broker2:9092", "broker3:9092"]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = test_config();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.kafka.brokers = " , ".to_string();
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.kafka.topic = String::new();
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.consumer.retry_initial_ms = 5000;
        config.consumer.retry_max_ms = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_policy_selection() {
        let mut config = test_config().consumer;
        let mut policy = config.retry_policy();
        assert_eq!(policy.next_delay(), Duration::ZERO);

        config.retry_backoff = true;
        let mut policy = config.retry_policy();
        assert!(policy.next_delay() > Duration::ZERO);
    }
}
