//! In-memory event store
//!
//! The store is the only state shared between the Kafka consumer and the
//! HTTP handlers. It is an ordered, append-only sequence of `SalesEvent`s
//! behind a single `RwLock`: appends take the write side, snapshots copy the
//! sequence under the read side. Handles are cheap to clone and all point at
//! the same sequence.
//!
//! By default the store grows without bound for the lifetime of the process.
//! A capacity can be set explicitly, in which case the oldest events are
//! evicted once it is reached.

use parking_lot::RwLock;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::models::SalesEvent;

/// Shared handle to the accumulated sales events
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    events: VecDeque<SalesEvent>,
    capacity: Option<NonZeroUsize>,
    evicted: u64,
}

impl EventStore {
    /// Create an empty, unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that keeps at most `capacity` events
    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                events: VecDeque::with_capacity(capacity.get()),
                capacity: Some(capacity),
                evicted: 0,
            })),
        }
    }

    /// Create a store from configuration
    pub fn from_config(config: &StoreConfig) -> Self {
        match config.capacity() {
            Some(capacity) => Self::bounded(capacity),
            None => Self::new(),
        }
    }

    /// Append an event to the tail of the store
    pub fn append(&self, event: SalesEvent) {
        let mut inner = self.inner.write();

        if let Some(capacity) = inner.capacity {
            if inner.events.len() >= capacity.get() {
                inner.events.pop_front();
                inner.evicted += 1;
                if inner.evicted == 1 {
                    warn!(
                        capacity = capacity.get(),
                        "Event store reached its capacity, evicting oldest events"
                    );
                } else {
                    debug!(evicted = inner.evicted, "Evicted oldest event");
                }
            }
        }

        inner.events.push_back(event);
    }

    /// Copy of all events currently held, in arrival order
    pub fn snapshot(&self) -> Vec<SalesEvent> {
        self.inner.read().events.iter().cloned().collect()
    }

    /// Number of events currently held
    pub fn len(&self) -> usize {
        self.inner.read().events.len()
    }

    /// Whether the store holds no events
    pub fn is_empty(&self) -> bool {
        self.inner.read().events.is_empty()
    }

    /// Configured capacity, `None` when unbounded
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.inner.read().capacity
    }

    /// Number of events evicted because the capacity was reached
    pub fn evicted(&self) -> u64 {
        self.inner.read().evicted
    }
}
