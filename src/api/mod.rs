//! API module for salesfeed
//!
//! This module contains the HTTP query endpoint and the server setup
//! around it.

pub mod events;
pub mod server;

pub use events::{list_events, preflight};
pub use server::{create_router, create_server, shutdown_signal};

/// Path of the events endpoint
pub const EVENTS_PATH: &str = "/events";

/// Value of `Access-Control-Allow-Methods`
pub const ALLOWED_METHODS: &str = "GET, OPTIONS";

/// Value of `Access-Control-Allow-Headers`
pub const ALLOWED_HEADERS: &str = "Content-Type";
