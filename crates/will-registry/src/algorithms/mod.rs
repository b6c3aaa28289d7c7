//! # Algorithms Module
//!
//! Pure computations used by the registry.

pub mod settlement;

pub use settlement::{allocation_amount, plan_settlement, Settlement};
