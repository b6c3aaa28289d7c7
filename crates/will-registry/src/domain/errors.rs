//! # Domain Errors
//!
//! Every rejection the registry can produce. All of them are raised before any
//! state is touched, so a failed call leaves the registry exactly as it was.

use super::value_objects::{short_principal, Principal, WillId};
use std::fmt;
use thiserror::Error;

/// Role a caller failed to hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Creator of the will.
    Testator,
    /// Registry owner.
    Owner,
    /// Owner or an explicitly authorised executor.
    Executor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Testator => write!(f, "testator"),
            Role::Owner => write!(f, "owner"),
            Role::Executor => write!(f, "executor"),
        }
    }
}

/// Registry error types.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Empty required string, out-of-range percentage or null recipient.
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Will id outside `[1, counter]`.
    #[error("Will not found: {0}")]
    NotFound(WillId),

    /// Beneficiary index past the end of the list.
    #[error("Beneficiary index {index} out of range for will {will_id} (count: {count})")]
    IndexOutOfRange {
        /// Will queried.
        will_id: WillId,
        /// Requested index.
        index: usize,
        /// Beneficiaries on the will.
        count: usize,
    },

    /// Caller lacks the role the operation requires.
    #[error("Unauthorized: {} is not {role}", short_principal(.caller))]
    Unauthorized {
        /// Rejected caller.
        caller: Principal,
        /// Role that was required.
        role: Role,
    },

    /// Will has already been settled.
    #[error("Will {0} already executed")]
    AlreadyExecuted(WillId),

    /// Will is deactivated.
    #[error("Will {0} is inactive")]
    InactiveWill(WillId),

    /// Nothing to settle.
    #[error("Will {0} has no beneficiaries")]
    NoBeneficiaries(WillId),

    /// Accepting the allocation would push the will past 100%.
    #[error("Allocation exceeded for will {will_id}: {allocated}% + {requested}% > 100%")]
    AllocationExceeded {
        /// Will being populated.
        will_id: WillId,
        /// Sum already allocated.
        allocated: u16,
        /// Percentage that was rejected.
        requested: u8,
    },
}

impl RegistryError {
    /// Shorthand for [`RegistryError::InvalidInput`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures reported by the value ledger while moving funds.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Recipient refused the transfer.
    #[error("Recipient {} rejected transfer", short_principal(.0))]
    RecipientRejected(Principal),

    /// Crediting the recipient would overflow its balance.
    #[error("Balance overflow for {}", short_principal(.0))]
    BalanceOverflow(Principal),
}
