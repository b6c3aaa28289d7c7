//! # Adapters Layer
//!
//! Concrete implementations of the driven ports.

pub mod event_bus;
pub mod in_memory_ledger;
pub mod tracing_sink;

pub use event_bus::InMemoryEventBus;
pub use in_memory_ledger::InMemoryLedger;
pub use tracing_sink::TracingEventSink;
