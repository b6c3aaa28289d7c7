//! # Ports Layer
//!
//! Trait definitions between the registry and the outside world.
//!
//! - **Driving Port (Inbound)**: `WillRegistryApi`
//! - **Driven Ports (Outbound)**: `ValueLedger`, `WillEventPublisher`, `TimeSource`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
