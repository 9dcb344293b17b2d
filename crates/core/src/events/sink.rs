//! Market event sink trait and implementations.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use super::MarketEvent;

/// Trait for receiving market events.
///
/// # Design Rules
///
/// - `emit()` must be fast and non-blocking (no network calls, no DB writes)
/// - Failure to emit must not affect the sync that produced the event
pub trait MarketEventSink: Send + Sync {
    /// Emit a single market event.
    fn emit(&self, event: MarketEvent);
}

/// No-op implementation for contexts that don't need events.
#[derive(Clone, Default)]
pub struct NoOpMarketEventSink;

impl MarketEventSink for NoOpMarketEventSink {
    fn emit(&self, _event: MarketEvent) {}
}

/// Fans events out to any number of subscribers.
///
/// Subscribers that fall behind lose the oldest events; producers never block.
#[derive(Clone)]
pub struct BroadcastMarketEventSink {
    sender: broadcast::Sender<MarketEvent>,
}

impl BroadcastMarketEventSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastMarketEventSink {
    fn default() -> Self {
        Self::new(16)
    }
}

impl MarketEventSink for BroadcastMarketEventSink {
    fn emit(&self, event: MarketEvent) {
        // No subscribers is not an error.
        let _ = self.sender.send(event);
    }
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockMarketEventSink {
    events: Arc<Mutex<Vec<MarketEvent>>>,
}

impl MockMarketEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<MarketEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Returns the number of collected events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Returns true if no events have been collected.
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl MarketEventSink for MockMarketEventSink {
    fn emit(&self, event: MarketEvent) {
        self.events.lock().unwrap().push(event);
    }
}
