//! # Driving Port (API - Inbound)
//!
//! The operation set exposed to callers. Every mutating call names the calling
//! principal explicitly; the registry trusts it as already authenticated.

use crate::algorithms::Settlement;
use crate::domain::{
    Amount, BeneficiaryView, Principal, RegistryError, Transfer, WillId, WillView,
};
use crate::registry::{AddBeneficiaryRequest, CreateWillRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A transfer the ledger refused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFailure {
    /// Instruction that was attempted.
    pub transfer: Transfer,
    /// Ledger's reason, rendered.
    pub reason: String,
}

/// Result of executing a will and dispatching its transfers.
///
/// The will is executed even when `failures` is non-empty; failed transfers
/// are not rolled back or retried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    /// What the registry committed.
    pub settlement: Settlement,
    /// Instructions the ledger accepted, in dispatch order.
    pub delivered: Vec<Transfer>,
    /// Instructions the ledger refused.
    pub failures: Vec<TransferFailure>,
}

impl SettlementReport {
    /// Every instruction reached its recipient.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Value actually moved by the ledger.
    pub fn delivered_amount(&self) -> Amount {
        self.delivered.iter().map(|t| t.amount).sum()
    }
}

/// Result of an emergency withdrawal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalReport {
    /// Owner transfer drawn from the held balance.
    pub transfer: Transfer,
    /// Set when the ledger refused the transfer.
    pub failure: Option<TransferFailure>,
}

/// Primary API of the will registry.
#[async_trait]
pub trait WillRegistryApi: Send + Sync {
    /// Create a will owned by `caller`.
    async fn create_will(
        &self,
        caller: Principal,
        request: CreateWillRequest,
    ) -> Result<WillId, RegistryError>;

    /// Append a beneficiary and return its index.
    async fn add_beneficiary(
        &self,
        caller: Principal,
        request: AddBeneficiaryRequest,
    ) -> Result<usize, RegistryError>;

    /// Mark a draft will inactive.
    async fn deactivate_will(&self, caller: Principal, will_id: WillId)
        -> Result<(), RegistryError>;

    /// Mark a draft will active.
    async fn reactivate_will(&self, caller: Principal, will_id: WillId)
        -> Result<(), RegistryError>;

    /// Execute a will and dispatch its transfers.
    async fn execute_will(
        &self,
        caller: Principal,
        will_id: WillId,
    ) -> Result<SettlementReport, RegistryError>;

    /// Grant execution rights (owner only).
    async fn authorize_executor(
        &self,
        caller: Principal,
        executor: Principal,
    ) -> Result<(), RegistryError>;

    /// Withdraw execution rights (owner only).
    async fn revoke_executor(
        &self,
        caller: Principal,
        executor: Principal,
    ) -> Result<(), RegistryError>;

    /// Drain the held balance to the owner (owner only).
    async fn emergency_withdraw(&self, caller: Principal)
        -> Result<WithdrawalReport, RegistryError>;

    /// Snapshot of a will.
    fn get_will(&self, will_id: WillId) -> Result<WillView, RegistryError>;

    /// Snapshot of one beneficiary.
    fn get_beneficiary(
        &self,
        will_id: WillId,
        index: usize,
    ) -> Result<BeneficiaryView, RegistryError>;

    /// Will ids created by `testator`.
    fn get_testator_wills(&self, testator: &Principal) -> Vec<WillId>;

    /// What execution would distribute right now.
    fn preview_settlement(&self, will_id: WillId) -> Result<Settlement, RegistryError>;
}
