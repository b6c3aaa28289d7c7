//! # Domain Events
//!
//! Notifications handed to the event collaborator. Fire-and-forget: the
//! registry never waits for, or depends on, delivery.

use super::value_objects::{Amount, Principal, WillId};
use serde::{Deserialize, Serialize};

/// Event emitted by a committed registry transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WillEvent {
    /// A will was created.
    WillCreated {
        /// New will id.
        will_id: WillId,
        /// Creating principal.
        testator: Principal,
        /// Testator display name.
        name: String,
    },
    /// A beneficiary was appended.
    BeneficiaryAdded {
        /// Parent will.
        will_id: WillId,
        /// Receiving principal.
        beneficiary: Principal,
        /// Allocation in percent.
        allocation: u8,
    },
    /// A will was settled.
    WillExecuted {
        /// Settled will.
        will_id: WillId,
        /// Principal that triggered execution.
        executor: Principal,
    },
    /// A will was deactivated by its testator.
    WillDeactivated {
        /// Affected will.
        will_id: WillId,
        /// Testator.
        testator: Principal,
    },
    /// A will was reactivated by its testator.
    WillReactivated {
        /// Affected will.
        will_id: WillId,
        /// Testator.
        testator: Principal,
    },
    /// The owner granted execution rights.
    ExecutorAuthorized {
        /// Newly authorised principal.
        executor: Principal,
    },
    /// The owner withdrew execution rights.
    ExecutorRevoked {
        /// Principal losing the flag.
        executor: Principal,
    },
    /// The owner drained the held balance.
    EmergencyWithdrawal {
        /// Registry owner.
        owner: Principal,
        /// Units withdrawn.
        amount: Amount,
    },
}

impl WillEvent {
    /// Will the event refers to, if any.
    pub fn will_id(&self) -> Option<WillId> {
        match self {
            Self::WillCreated { will_id, .. }
            | Self::BeneficiaryAdded { will_id, .. }
            | Self::WillExecuted { will_id, .. }
            | Self::WillDeactivated { will_id, .. }
            | Self::WillReactivated { will_id, .. } => Some(*will_id),
            Self::ExecutorAuthorized { .. }
            | Self::ExecutorRevoked { .. }
            | Self::EmergencyWithdrawal { .. } => None,
        }
    }

    /// Stable event name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::WillCreated { .. } => "WillCreated",
            Self::BeneficiaryAdded { .. } => "BeneficiaryAdded",
            Self::WillExecuted { .. } => "WillExecuted",
            Self::WillDeactivated { .. } => "WillDeactivated",
            Self::WillReactivated { .. } => "WillReactivated",
            Self::ExecutorAuthorized { .. } => "ExecutorAuthorized",
            Self::ExecutorRevoked { .. } => "ExecutorRevoked",
            Self::EmergencyWithdrawal { .. } => "EmergencyWithdrawal",
        }
    }
}
