//! Event publisher that writes each event to the log as a JSON payload.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::WillEvent;
use crate::ports::WillEventPublisher;

/// Logs events instead of delivering them anywhere.
#[derive(Debug, Default)]
pub struct TracingEventSink {
    logged: AtomicU64,
}

impl TracingEventSink {
    /// New sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events logged so far.
    pub fn logged(&self) -> u64 {
        self.logged.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl WillEventPublisher for TracingEventSink {
    async fn publish(&self, event: WillEvent) -> usize {
        match serde_json::to_string(&event) {
            Ok(payload) => {
                info!(event = event.name(), %payload, "Will event");
                self.logged.fetch_add(1, Ordering::Relaxed);
                1
            }
            Err(e) => {
                warn!(event = event.name(), error = %e, "Failed to encode will event");
                0
            }
        }
    }
}
