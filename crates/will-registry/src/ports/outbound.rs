//! # Driven Ports (SPI - Outbound)
//!
//! Collaborators the registry service depends on:
//! - Value ledger (moves funds for settlement and withdrawal)
//! - Event publisher (fire-and-forget notifications)
//! - Time source (timestamps for creation and execution)

use crate::domain::{LedgerError, Timestamp, Transfer, WillEvent};
use async_trait::async_trait;

// =============================================================================
// VALUE LEDGER
// =============================================================================

/// Moves value on behalf of the registry.
///
/// Each call is independent: a failure for one recipient says nothing about
/// the next one, and the registry never retries.
#[async_trait]
pub trait ValueLedger: Send + Sync {
    /// Credit `transfer.amount` to `transfer.recipient`.
    async fn transfer(&self, transfer: &Transfer) -> Result<(), LedgerError>;
}

// =============================================================================
// EVENT PUBLISHER
// =============================================================================

/// Receives registry events after each committed transition.
#[async_trait]
pub trait WillEventPublisher: Send + Sync {
    /// Publish an event.
    ///
    /// # Returns
    ///
    /// The number of receivers that observed it. Zero is not an error.
    async fn publish(&self, event: WillEvent) -> usize;
}

// =============================================================================
// TIME SOURCE
// =============================================================================

/// Time source for creation and execution timestamps.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Current time in seconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Settable time source for unit tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockTimeSource {
    time: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: std::sync::atomic::AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.time
            .fetch_add(secs, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(std::sync::atomic::Ordering::SeqCst)
    }
}
