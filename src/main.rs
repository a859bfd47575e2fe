//! salesfeed - sales events from Kafka, served over HTTP
//!
//! This application consumes sales events from a Kafka topic, keeps them in
//! memory and serves the accumulated list on `GET /events`.

use std::sync::Arc;

use salesfeed::{
    config::Config, create_server, logging, EventConsumer, EventStore, KafkaSource, Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Arc::new(Config::from_env()?);

    // Validate configuration
    config.validate()?;

    // Initialize logging/tracing
    logging::init_tracing(&config.server.log_level, &config.server.environment)?;

    config.log_config();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting salesfeed");

    let store = EventStore::from_config(&config.store);

    let source = KafkaSource::new(&config.kafka)?;
    let consumer = EventConsumer::new(source, store.clone())
        .with_retry_policy(config.consumer.retry_policy());

    tokio::spawn(async move {
        let stats = consumer.run().await;
        tracing::warn!(?stats, "Kafka consumer exited");
    });

    create_server(config, store).await?;

    tracing::info!("salesfeed shutdown complete");
    Ok(())
}
