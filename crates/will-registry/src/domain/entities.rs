//! # Domain Entities
//!
//! The will aggregate and its beneficiaries.
//!
//! Fields are private to the crate: every mutation goes through the registry so
//! that the allocation ceiling and the one-way execution flag cannot be
//! bypassed.

use super::errors::RegistryError;
use super::value_objects::{Amount, Principal, Timestamp, WillId, WillState};
use serde::{Deserialize, Serialize};

/// Recipient entry with an allocation and a claim flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Beneficiary {
    pub(crate) recipient: Principal,
    pub(crate) name: String,
    pub(crate) allocation_percent: u8,
    pub(crate) asset_description: String,
    pub(crate) claimed: bool,
}

impl Beneficiary {
    pub(crate) fn new(
        recipient: Principal,
        name: String,
        allocation_percent: u8,
        asset_description: String,
    ) -> Self {
        Self {
            recipient,
            name,
            allocation_percent,
            asset_description,
            claimed: false,
        }
    }

    /// Receiving principal.
    pub fn recipient(&self) -> &Principal {
        &self.recipient
    }

    /// Allocation in whole percent (1-100).
    pub fn allocation_percent(&self) -> u8 {
        self.allocation_percent
    }

    /// Whether a distribution instruction has been emitted.
    pub fn is_claimed(&self) -> bool {
        self.claimed
    }
}

/// Parameters for creating a will.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WillParams {
    /// Identifier assigned by the registry.
    pub id: WillId,
    /// Creating principal.
    pub testator: Principal,
    /// Display name of the testator.
    pub testator_name: String,
    /// Free-text trigger description.
    pub execution_conditions: String,
    /// Value deposited at creation.
    pub total_value: Amount,
    /// Creation timestamp.
    pub created_at: Timestamp,
}

/// A will: metadata plus an append-only beneficiary list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Will {
    pub(crate) id: WillId,
    pub(crate) testator: Principal,
    pub(crate) testator_name: String,
    pub(crate) execution_conditions: String,
    pub(crate) is_executed: bool,
    pub(crate) is_active: bool,
    pub(crate) created_at: Timestamp,
    pub(crate) executed_at: Option<Timestamp>,
    pub(crate) total_value: Amount,
    pub(crate) beneficiaries: Vec<Beneficiary>,
}

impl Will {
    /// Create a new active, unexecuted will with no beneficiaries.
    pub fn new(params: WillParams) -> Self {
        Self {
            id: params.id,
            testator: params.testator,
            testator_name: params.testator_name,
            execution_conditions: params.execution_conditions,
            is_executed: false,
            is_active: true,
            created_at: params.created_at,
            executed_at: None,
            total_value: params.total_value,
            beneficiaries: Vec::new(),
        }
    }

    /// Will identifier.
    pub fn id(&self) -> WillId {
        self.id
    }

    /// Creating principal.
    pub fn testator(&self) -> &Principal {
        &self.testator
    }

    /// Value fixed at creation.
    pub fn total_value(&self) -> Amount {
        self.total_value
    }

    /// Whether the will has been settled.
    pub fn is_executed(&self) -> bool {
        self.is_executed
    }

    /// Whether the will may be executed.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Lifecycle state derived from the execution flag.
    pub fn state(&self) -> WillState {
        if self.is_executed {
            WillState::Executed
        } else {
            WillState::Draft
        }
    }

    /// Beneficiaries in index order.
    pub fn beneficiaries(&self) -> &[Beneficiary] {
        &self.beneficiaries
    }

    /// Sum of allocation percentages.
    pub fn total_allocation(&self) -> u16 {
        self.beneficiaries
            .iter()
            .map(|b| u16::from(b.allocation_percent))
            .sum()
    }

    /// Beneficiary at `index`.
    pub fn beneficiary(&self, index: usize) -> Result<&Beneficiary, RegistryError> {
        self.beneficiaries
            .get(index)
            .ok_or(RegistryError::IndexOutOfRange {
                will_id: self.id,
                index,
                count: self.beneficiaries.len(),
            })
    }

    /// Append a beneficiary. Callers must have run the allocation guards.
    pub(crate) fn push_beneficiary(&mut self, beneficiary: Beneficiary) -> usize {
        self.beneficiaries.push(beneficiary);
        self.beneficiaries.len() - 1
    }

    /// One-way flip into `Executed`.
    pub(crate) fn mark_executed(&mut self, now: Timestamp) -> Result<(), RegistryError> {
        if !self.state().can_transition_to(WillState::Executed) {
            return Err(RegistryError::AlreadyExecuted(self.id));
        }
        self.is_executed = true;
        self.executed_at = Some(now);
        Ok(())
    }
}

/// Read-only snapshot of a will.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WillView {
    /// Will identifier.
    pub id: WillId,
    /// Creating principal.
    pub testator: Principal,
    /// Display name of the testator.
    pub testator_name: String,
    /// Free-text trigger description.
    pub execution_conditions: String,
    /// Settled flag.
    pub is_executed: bool,
    /// Activation flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Settlement timestamp, unset until executed.
    pub executed_at: Option<Timestamp>,
    /// Value fixed at creation.
    pub total_value: Amount,
    /// Number of beneficiaries.
    pub beneficiary_count: usize,
    /// Sum of allocation percentages.
    pub total_allocation: u16,
}

impl From<&Will> for WillView {
    fn from(will: &Will) -> Self {
        Self {
            id: will.id,
            testator: will.testator,
            testator_name: will.testator_name.clone(),
            execution_conditions: will.execution_conditions.clone(),
            is_executed: will.is_executed,
            is_active: will.is_active,
            created_at: will.created_at,
            executed_at: will.executed_at,
            total_value: will.total_value,
            beneficiary_count: will.beneficiaries.len(),
            total_allocation: will.total_allocation(),
        }
    }
}

/// Read-only snapshot of a beneficiary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaryView {
    /// Position in the parent will.
    pub index: usize,
    /// Receiving principal.
    pub recipient: Principal,
    /// Display name.
    pub name: String,
    /// Allocation in whole percent.
    pub allocation_percent: u8,
    /// Free-text description of the bequeathed asset.
    pub asset_description: String,
    /// Claim flag.
    pub claimed: bool,
}

impl BeneficiaryView {
    pub(crate) fn from_entry(index: usize, beneficiary: &Beneficiary) -> Self {
        Self {
            index,
            recipient: beneficiary.recipient,
            name: beneficiary.name.clone(),
            allocation_percent: beneficiary.allocation_percent,
            asset_description: beneficiary.asset_description.clone(),
            claimed: beneficiary.claimed,
        }
    }
}
