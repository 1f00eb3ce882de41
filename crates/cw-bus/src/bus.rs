//! In-memory publish/subscribe bus over [`NodeEvent`].
//!
//! Backed by a [`tokio::sync::broadcast`] channel: every subscriber sees
//! every event and filters by matching on the variant it cares about.
//! There is no cross-process trust boundary here, so unlike a wire bus
//! this carries no envelope signing or replay protection.

use crate::events::NodeEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

pub struct EventBus {
    sender: broadcast::Sender<NodeEvent>,
    published: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NodeEvent> {
        self.sender.subscribe()
    }

    /// Publish `event` to all current subscribers. Returns the number of
    /// receivers the broadcast was delivered to; zero just means nobody
    /// is currently listening, which is not an error.
    pub fn publish(&self, event: NodeEvent) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);
        match self.sender.send(event.clone()) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::debug!(topic = event.topic(), "published with no subscribers");
                0
            }
        }
    }

    pub fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
