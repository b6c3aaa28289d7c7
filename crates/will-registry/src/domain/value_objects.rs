//! # Domain Value Objects
//!
//! Immutable value types shared by the registry, the will aggregate and the
//! settlement engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Principal handle (20-byte account identity).
pub type Principal = [u8; 20];

/// Will identifier. Issued from 1 upwards.
pub type WillId = u64;

/// Units of value.
pub type Amount = u64;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// The null principal. Never a valid recipient.
pub const ZERO_PRINCIPAL: Principal = [0u8; 20];

/// Reserved "no will" id. Never issued.
pub const NO_WILL: WillId = 0;

/// Smallest allocation a single beneficiary may hold.
pub const MIN_ALLOCATION_PERCENT: u8 = 1;

/// Ceiling for a single allocation and for the sum across a will.
pub const MAX_ALLOCATION_PERCENT: u8 = 100;

/// Lifecycle of a will.
///
/// ```text
/// [Draft] ──execute──→ [Executed]
/// ```
///
/// `is_active` is an orthogonal flag that only matters while in `Draft`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WillState {
    /// Accepting beneficiaries, not yet settled.
    #[default]
    Draft,
    /// Settled. Terminal.
    Executed,
}

impl WillState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: WillState) -> bool {
        matches!((self, next), (Self::Draft, Self::Executed))
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Executed)
    }
}

impl fmt::Display for WillState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "Draft"),
            Self::Executed => write!(f, "Executed"),
        }
    }
}

/// A value-movement instruction handed to the ledger collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Receiving principal.
    pub recipient: Principal,
    /// Units to move.
    pub amount: Amount,
}

impl Transfer {
    /// Create a new transfer instruction.
    pub fn new(recipient: Principal, amount: Amount) -> Self {
        Self { recipient, amount }
    }
}

/// What happens to value left over after a settlement.
///
/// Residual comes from allocations summing below 100% and from rounding
/// each share down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidualPolicy {
    /// Residual stays in the registry's held balance.
    #[default]
    Stranded,
    /// Residual is sent back to the testator after all beneficiary transfers.
    ReturnToTestator,
}

impl FromStr for ResidualPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stranded" => Ok(Self::Stranded),
            "return_to_testator" | "return-to-testator" => Ok(Self::ReturnToTestator),
            other => Err(format!("unknown residual policy: {other}")),
        }
    }
}

/// Short hex rendering of a principal for log fields.
pub fn short_principal(principal: &Principal) -> String {
    format!(
        "{:02x}{:02x}{:02x}{:02x}..",
        principal[0], principal[1], principal[2], principal[3]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_will_state_draft_to_executed() {
        assert!(WillState::Draft.can_transition_to(WillState::Executed));
    }

    #[test]
    fn test_will_state_executed_is_terminal() {
        assert!(WillState::Executed.is_terminal());
        assert!(!WillState::Draft.is_terminal());
        assert!(!WillState::Executed.can_transition_to(WillState::Draft));
        assert!(!WillState::Executed.can_transition_to(WillState::Executed));
    }

    #[test]
    fn test_residual_policy_parse() {
        assert_eq!(
            "stranded".parse::<ResidualPolicy>().unwrap(),
            ResidualPolicy::Stranded
        );
        assert_eq!(
            "Return_To_Testator".parse::<ResidualPolicy>().unwrap(),
            ResidualPolicy::ReturnToTestator
        );
        assert!("burn".parse::<ResidualPolicy>().is_err());
    }

    #[test]
    fn test_short_principal() {
        let p = [0xABu8; 20];
        assert_eq!(short_principal(&p), "abababab..");
    }
}
