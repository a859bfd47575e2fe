//! Data models for salesfeed
//!
//! This module contains the sales event record and the decoder that turns
//! Kafka payloads into it.

pub mod decode;
pub mod error;
pub mod event;

// Re-export commonly used types
pub use decode::decode;
pub use error::{DecodeError, DecodeErrorKind};
pub use event::SalesEvent;
