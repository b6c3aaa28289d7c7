//! # Domain Module
//!
//! Pure will-registry types. No I/O: everything outside the process is reached
//! through the ports in [`crate::ports`].

pub mod entities;
pub mod errors;
pub mod events;
pub mod invariants;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use events::*;
pub use invariants::*;
pub use value_objects::*;
