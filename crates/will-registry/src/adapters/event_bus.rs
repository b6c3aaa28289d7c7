//! # Event Bus Adapter
//!
//! In-process publisher over `tokio::sync::broadcast`. Multi-consumer; a
//! publish with no subscribers is dropped and reported as zero receivers.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::config::DEFAULT_EVENT_CHANNEL_CAPACITY;
use crate::domain::WillEvent;
use crate::ports::WillEventPublisher;

/// Broadcast event bus for registry events.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<WillEvent>,
    events_published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CHANNEL_CAPACITY)
    }

    /// Bus buffering up to `capacity` events per lagging receiver.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; `RegistryConfig::validate` rejects that.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// New receiver seeing every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<WillEvent> {
        debug!("New will event subscription");
        self.sender.subscribe()
    }

    /// Active receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Configured channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total publish attempts, delivered or not.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WillEventPublisher for InMemoryEventBus {
    async fn publish(&self, event: WillEvent) -> usize {
        let name = event.name();
        let will_id = event.will_id();

        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(event = name, ?will_id, receivers, "Event published");
                receivers
            }
            Err(_) => {
                warn!(event = name, ?will_id, "Event dropped (no receivers)");
                0
            }
        }
    }
}
