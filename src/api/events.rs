//! Handlers for the `/events` endpoint

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::Result;
use crate::logging::Timer;
use crate::store::EventStore;

/// Return every stored event as a JSON array, in arrival order
///
/// # Example
/// ```text
/// GET /events
/// ```
pub async fn list_events(State(store): State<EventStore>) -> Result<Response> {
    let events = store.snapshot();

    let timer = Timer::start("serialize_events");
    let body = serde_json::to_vec(&events)?;
    timer.stop();

    debug!(count = events.len(), bytes = body.len(), "Serving events snapshot");

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Answer CORS preflight requests with an empty 200
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
