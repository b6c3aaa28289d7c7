//! # Will Registry
//!
//! Registry of digital wills with percentage-based allocation and one-shot
//! settlement.
//!
//! ## Purpose
//!
//! A testator records a will, appends beneficiaries with whole-percent
//! allocations, and an authorised executor later triggers a single settlement
//! that turns the allocations into value transfers.
//!
//! ## Domain Rules
//!
//! | Rule | Enforcement Location |
//! |------|---------------------|
//! | Allocations on a will never sum past 100% | `domain/invariants.rs` - `invariant_allocation_ceiling()` |
//! | A will is executed at most once | `domain/entities.rs` - `Will::mark_executed()` |
//! | Only the testator edits a will | `domain/invariants.rs` - `invariant_is_testator()` |
//! | Only the owner manages executors and withdraws | `registry.rs` - `ensure_owner()` |
//! | Shares are `floor(total * pct / 100)` | `algorithms/settlement.rs` - `allocation_amount()` |
//!
//! ## Lifecycle
//!
//! ```text
//! [DRAFT, active] ──deactivate──→ [DRAFT, inactive]
//!        │        ←─reactivate───
//!        │
//!        └──execute──→ [EXECUTED] (terminal)
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - in-memory ledger, broadcast bus, tracing sink      │
//! │  service.rs - WillRegistryService (locking, dispatch)           │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - WillRegistryApi trait                      │
//! │  ports/outbound.rs - ValueLedger, WillEventPublisher, TimeSource│
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  registry.rs             - WillRegistry state machine           │
//! │  algorithms/settlement.rs - share computation                   │
//! │  domain/                 - entities, events, errors, guards     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
pub mod ports;
pub mod registry;
pub mod service;
pub mod telemetry;

pub use adapters::{InMemoryEventBus, InMemoryLedger, TracingEventSink};
pub use algorithms::{allocation_amount, plan_settlement, Settlement};
pub use config::{ConfigError, RegistryConfig};
pub use domain::*;
pub use ports::*;
pub use registry::{AddBeneficiaryRequest, CreateWillRequest, WillRegistry};
pub use service::{ServiceStats, WillRegistryService};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
