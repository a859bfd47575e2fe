//! salesfeed library
//!
//! This library exposes the core modules of salesfeed for use in integration
//! tests and by the service binaries.

pub mod api;
pub mod config;
pub mod error;
pub mod kafka;
pub mod logging;
pub mod models;
pub mod store;
pub mod test_utils;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use store::EventStore;

// Re-export model types
pub use models::{decode, DecodeError, DecodeErrorKind, SalesEvent};

// Re-export consumer types
pub use kafka::{ConsumerStats, EventConsumer, KafkaSource, MessageSource};

// Re-export API server functions
pub use api::server::{create_router, create_server, shutdown_signal};
