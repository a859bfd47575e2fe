//! sales-producer - publishes sample sales events
//!
//! Feeds the configured topic with one random sales event per interval,
//! for local runs of the dashboard.

use envconfig::Envconfig;
use std::time::Duration;

use salesfeed::{
    config::KafkaConfig,
    kafka::{SalesEventGenerator, SalesProducer},
    logging, shutdown_signal, Error, Result,
};

/// Producer configuration
#[derive(Debug, Clone, Envconfig)]
struct ProducerConfig {
    #[envconfig(nested)]
    kafka: KafkaConfig,

    /// Pause between two events in milliseconds
    #[envconfig(from = "PRODUCER_INTERVAL_MS", default = "3000")]
    interval_ms: u64,

    /// Stop after this many events (0 runs until interrupted)
    #[envconfig(from = "PRODUCER_MAX_EVENTS", default = "0")]
    max_events: u64,

    #[envconfig(from = "LOG_LEVEL", default = "info")]
    log_level: String,

    #[envconfig(from = "ENVIRONMENT", default = "development")]
    environment: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = ProducerConfig::init_from_env().map_err(Error::from)?;

    logging::init_tracing(&config.log_level, &config.environment)?;

    let producer = SalesProducer::new(config.kafka.build_producer_config(), &config.kafka.topic)?;
    let generator = SalesEventGenerator::default();

    tracing::info!(
        brokers = %config.kafka.brokers,
        topic = %config.kafka.topic,
        interval_ms = config.interval_ms,
        "Starting sales producer"
    );

    let run = async {
        let mut interval = tokio::time::interval(Duration::from_millis(config.interval_ms.max(1)));
        let mut sent = 0u64;

        while config.max_events == 0 || sent < config.max_events {
            interval.tick().await;

            let event = generator.generate(&mut rand::thread_rng(), chrono::Utc::now());
            match producer.send(&event).await {
                Ok(()) => {
                    sent += 1;
                    tracing::info!(
                        id = %event.id,
                        product = %event.product,
                        region = %event.region,
                        amount = event.amount,
                        "Produced sales event"
                    );
                },
                Err(e) => tracing::error!(error = %e, "Failed to produce sales event"),
            }
        }

        sent
    };

    tokio::select! {
        sent = run => tracing::info!(sent, "Sales producer finished"),
        _ = shutdown_signal() => tracing::info!("Sales producer interrupted"),
    }

    Ok(())
}
