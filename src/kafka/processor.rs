//! Message processing logic for Kafka events

use tracing::{info, warn};

use super::{ProcessingResult, SourceMessage};
use crate::models::decode;
use crate::store::EventStore;

/// Decodes messages and appends the resulting events to the store
#[derive(Debug, Clone)]
pub struct MessageProcessor {
    store: EventStore,
}

impl MessageProcessor {
    /// Create a new message processor
    pub fn new(store: EventStore) -> Self {
        Self { store }
    }

    /// Process a single message
    ///
    /// A payload that fails to decode is logged and dropped; nothing is
    /// appended for it.
    pub fn process_message(&self, message: &SourceMessage) -> ProcessingResult {
        match decode(&message.payload) {
            Ok(event) => {
                self.store.append(event.clone());
                info!(
                    id = %event.id,
                    product = %event.product,
                    region = %event.region,
                    amount = event.amount,
                    timestamp = %event.timestamp,
                    "Received sales event"
                );
                ProcessingResult::Accepted(event)
            },
            Err(error) => {
                warn!(
                    kind = error.kind.as_str(),
                    payload = %error.payload,
                    "Discarding undecodable message: {}",
                    error
                );
                ProcessingResult::Rejected(error)
            },
        }
    }
}
