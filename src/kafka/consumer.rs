//! Perpetual consumer loop feeding the event store
//!
//! The loop has no stop signal: it runs for as long as its source yields
//! messages, which for Kafka is the lifetime of the process. Transport and
//! payload errors are logged and skipped, never returned.

use std::time::Duration;
use tracing::{info, Instrument};

use super::{
    ContinueImmediately, MessageProcessor, MessageSource, ProcessingResult, RetryPolicy,
};
use crate::store::EventStore;

/// Counters collected by the consumer loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Messages read from the source
    pub received: u64,
    /// Messages decoded and appended
    pub accepted: u64,
    /// Messages discarded because they could not be decoded
    pub rejected: u64,
    /// Failed reads
    pub transport_errors: u64,
}

/// Event consumer that moves messages from a source into the store
pub struct EventConsumer<S> {
    /// Where messages come from
    source: S,

    /// Decodes and appends messages
    processor: MessageProcessor,

    /// Delay applied after failed reads
    retry: Box<dyn RetryPolicy>,

    stats: ConsumerStats,
}

impl<S: MessageSource> EventConsumer<S> {
    /// Create a consumer that retries failed reads immediately
    pub fn new(source: S, store: EventStore) -> Self {
        Self {
            source,
            processor: MessageProcessor::new(store),
            retry: Box::new(ContinueImmediately),
            stats: ConsumerStats::default(),
        }
    }

    /// Replace the retry policy applied after transport errors
    pub fn with_retry_policy(mut self, retry: Box<dyn RetryPolicy>) -> Self {
        self.retry = retry;
        self
    }

    /// Run the consumer loop until the source is exhausted
    pub async fn run(mut self) -> ConsumerStats {
        info!("Kafka consumer started");

        while let Some(next) = self.source.next_message().await {
            match next {
                Ok(message) => {
                    self.stats.received += 1;
                    self.retry.reset();

                    let span = crate::kafka_span!(message.partition, message.offset);
                    match span.in_scope(|| self.processor.process_message(&message)) {
                        ProcessingResult::Accepted(_) => self.stats.accepted += 1,
                        ProcessingResult::Rejected(_) => self.stats.rejected += 1,
                    }
                },
                Err(error) => {
                    self.stats.transport_errors += 1;
                    crate::log_error!(
                        error,
                        "Error reading message",
                        failures = self.stats.transport_errors
                    );
                    Self::pause(self.retry.next_delay()).await;
                },
            }
        }

        info!(
            received = self.stats.received,
            accepted = self.stats.accepted,
            rejected = self.stats.rejected,
            transport_errors = self.stats.transport_errors,
            "Message source exhausted, Kafka consumer stopped"
        );
        self.stats
    }

    /// Counters collected so far
    pub fn stats(&self) -> ConsumerStats {
        self.stats
    }

    async fn pause(delay: Duration) {
        if delay.is_zero() {
            // Give other tasks a turn when a failing source resolves immediately
            tokio::task::yield_now().await;
        } else {
            let delay_ms = delay.as_millis() as u64;
            tokio::time::sleep(delay)
                .instrument(tracing::debug_span!("retry_backoff", delay_ms))
                .await;
        }
    }
}
