//! # Will Registry
//!
//! Single-writer state machine owning every will, the id sequence, the
//! executor set and the held balance.
//!
//! Every mutating operation follows validate-then-commit: all guards run
//! against `&self` data first and the first mutation happens only once every
//! guard has passed. The single exception is execution, where the
//! `Draft → Executed` flip is committed before the transfers are computed so
//! that no later failure can reopen the will.
//!
//! Events are queued in an outbox and drained by the caller with
//! [`WillRegistry::take_events`]; the registry itself performs no I/O.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::algorithms::settlement::{plan_settlement, settle, Settlement};
use crate::domain::{
    invariant_active, invariant_allocation_ceiling, invariant_has_beneficiaries,
    invariant_is_testator, invariant_non_empty, invariant_non_null_recipient,
    invariant_not_executed, invariant_valid_percentage, short_principal, Amount, Beneficiary,
    BeneficiaryView, Principal, RegistryError, ResidualPolicy, Role, Timestamp, Transfer, Will,
    WillEvent, WillId, WillParams, WillView, NO_WILL,
};

/// Input for [`WillRegistry::create_will`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateWillRequest {
    /// Display name of the testator.
    pub testator_name: String,
    /// Free-text trigger description.
    pub execution_conditions: String,
    /// Value deposited alongside the will.
    pub deposited_value: Amount,
}

/// Input for [`WillRegistry::add_beneficiary`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddBeneficiaryRequest {
    /// Target will.
    pub will_id: WillId,
    /// Receiving principal.
    pub recipient: Principal,
    /// Display name.
    pub name: String,
    /// Allocation in whole percent.
    pub allocation_percent: u8,
    /// Free-text description of the bequeathed asset.
    pub asset_description: String,
}

/// The registry state.
#[derive(Debug)]
pub struct WillRegistry {
    owner: Principal,
    wills: HashMap<WillId, Will>,
    testator_wills: HashMap<Principal, Vec<WillId>>,
    executors: HashSet<Principal>,
    will_counter: WillId,
    held_balance: Amount,
    residual_policy: ResidualPolicy,
    outbox: Vec<WillEvent>,
}

impl WillRegistry {
    /// Initialise a registry. The owner is authorised as an executor.
    pub fn new(owner: Principal) -> Self {
        Self::with_policy(owner, ResidualPolicy::default())
    }

    /// Initialise a registry with an explicit residual policy.
    pub fn with_policy(owner: Principal, residual_policy: ResidualPolicy) -> Self {
        let mut executors = HashSet::new();
        executors.insert(owner);

        Self {
            owner,
            wills: HashMap::new(),
            testator_wills: HashMap::new(),
            executors,
            will_counter: NO_WILL,
            held_balance: 0,
            residual_policy,
            outbox: Vec::new(),
        }
    }

    // =========================================================================
    // Guards
    // =========================================================================

    fn will(&self, will_id: WillId) -> Result<&Will, RegistryError> {
        if will_id == NO_WILL || will_id > self.will_counter {
            return Err(RegistryError::NotFound(will_id));
        }
        self.wills
            .get(&will_id)
            .ok_or(RegistryError::NotFound(will_id))
    }

    fn will_mut(&mut self, will_id: WillId) -> Result<&mut Will, RegistryError> {
        if will_id == NO_WILL || will_id > self.will_counter {
            return Err(RegistryError::NotFound(will_id));
        }
        self.wills
            .get_mut(&will_id)
            .ok_or(RegistryError::NotFound(will_id))
    }

    fn ensure_owner(&self, caller: &Principal) -> Result<(), RegistryError> {
        if *caller != self.owner {
            return Err(RegistryError::Unauthorized {
                caller: *caller,
                role: Role::Owner,
            });
        }
        Ok(())
    }

    fn ensure_executor(&self, caller: &Principal) -> Result<(), RegistryError> {
        if !self.is_authorized_executor(caller) {
            return Err(RegistryError::Unauthorized {
                caller: *caller,
                role: Role::Executor,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Registry operations
    // =========================================================================

    /// Create a will owned by `caller` and return its id.
    pub fn create_will(
        &mut self,
        caller: Principal,
        request: CreateWillRequest,
        now: Timestamp,
    ) -> Result<WillId, RegistryError> {
        invariant_non_empty("testator_name", &request.testator_name)?;
        invariant_non_empty("execution_conditions", &request.execution_conditions)?;
        let held_balance = self
            .held_balance
            .checked_add(request.deposited_value)
            .ok_or_else(|| RegistryError::invalid("deposited_value", "held balance overflow"))?;

        self.will_counter += 1;
        let will_id = self.will_counter;

        let will = Will::new(WillParams {
            id: will_id,
            testator: caller,
            testator_name: request.testator_name.clone(),
            execution_conditions: request.execution_conditions,
            total_value: request.deposited_value,
            created_at: now,
        });

        self.wills.insert(will_id, will);
        self.testator_wills.entry(caller).or_default().push(will_id);
        self.held_balance = held_balance;

        info!(
            will_id,
            testator = %short_principal(&caller),
            total_value = request.deposited_value,
            "Will created"
        );

        self.outbox.push(WillEvent::WillCreated {
            will_id,
            testator: caller,
            name: request.testator_name,
        });

        Ok(will_id)
    }

    /// Grant execution rights. Owner only.
    pub fn authorize_executor(
        &mut self,
        caller: Principal,
        executor: Principal,
    ) -> Result<(), RegistryError> {
        self.ensure_owner(&caller)?;
        self.executors.insert(executor);

        info!(executor = %short_principal(&executor), "Executor authorized");
        self.outbox.push(WillEvent::ExecutorAuthorized { executor });
        Ok(())
    }

    /// Withdraw execution rights. Owner only.
    ///
    /// The owner keeps execution rights regardless of the flag.
    pub fn revoke_executor(
        &mut self,
        caller: Principal,
        executor: Principal,
    ) -> Result<(), RegistryError> {
        self.ensure_owner(&caller)?;
        self.executors.remove(&executor);

        info!(executor = %short_principal(&executor), "Executor revoked");
        self.outbox.push(WillEvent::ExecutorRevoked { executor });
        Ok(())
    }

    /// Drain the entire held balance to the owner. Owner only.
    ///
    /// Returns the instruction for the ledger; the amount may be zero.
    ///
    /// The drained value includes deposits of wills not yet executed. Those
    /// wills can still be executed afterwards: their transfers are issued in
    /// full, the held balance floors at zero and the shortfall is logged at
    /// `warn`.
    pub fn emergency_withdraw(&mut self, caller: Principal) -> Result<Transfer, RegistryError> {
        self.ensure_owner(&caller)?;

        let amount = std::mem::take(&mut self.held_balance);

        info!(owner = %short_principal(&caller), amount, "Emergency withdrawal");
        self.outbox.push(WillEvent::EmergencyWithdrawal {
            owner: caller,
            amount,
        });

        Ok(Transfer::new(self.owner, amount))
    }

    // =========================================================================
    // Will aggregate mutations
    // =========================================================================

    /// Append a beneficiary to a draft will and return its index.
    pub fn add_beneficiary(
        &mut self,
        caller: Principal,
        request: AddBeneficiaryRequest,
    ) -> Result<usize, RegistryError> {
        let will = self.will(request.will_id)?;
        invariant_is_testator(will, &caller)?;
        invariant_not_executed(will)?;
        invariant_non_null_recipient(&request.recipient)?;
        invariant_valid_percentage(request.allocation_percent)?;
        invariant_non_empty("name", &request.name)?;
        invariant_allocation_ceiling(will, request.allocation_percent)?;

        let will = self.will_mut(request.will_id)?;
        let index = will.push_beneficiary(Beneficiary::new(
            request.recipient,
            request.name,
            request.allocation_percent,
            request.asset_description,
        ));
        let total_allocation = will.total_allocation();

        info!(
            will_id = request.will_id,
            index,
            beneficiary = %short_principal(&request.recipient),
            allocation = request.allocation_percent,
            total_allocation,
            "Beneficiary added"
        );

        self.outbox.push(WillEvent::BeneficiaryAdded {
            will_id: request.will_id,
            beneficiary: request.recipient,
            allocation: request.allocation_percent,
        });

        Ok(index)
    }

    /// Mark a draft will inactive. Testator only.
    pub fn deactivate_will(
        &mut self,
        caller: Principal,
        will_id: WillId,
    ) -> Result<(), RegistryError> {
        self.set_active(caller, will_id, false)?;
        self.outbox.push(WillEvent::WillDeactivated {
            will_id,
            testator: caller,
        });
        Ok(())
    }

    /// Mark a draft will active again. Testator only.
    pub fn reactivate_will(
        &mut self,
        caller: Principal,
        will_id: WillId,
    ) -> Result<(), RegistryError> {
        self.set_active(caller, will_id, true)?;
        self.outbox.push(WillEvent::WillReactivated {
            will_id,
            testator: caller,
        });
        Ok(())
    }

    fn set_active(
        &mut self,
        caller: Principal,
        will_id: WillId,
        active: bool,
    ) -> Result<(), RegistryError> {
        let will = self.will(will_id)?;
        invariant_is_testator(will, &caller)?;
        invariant_not_executed(will)?;

        let will = self.will_mut(will_id)?;
        will.is_active = active;

        info!(will_id, active, "Will activation changed");
        Ok(())
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Settle a will exactly once.
    ///
    /// ## Guard order
    ///
    /// 1. `NotFound`
    /// 2. `Unauthorized` (neither owner nor authorised executor)
    /// 3. `AlreadyExecuted`
    /// 4. `InactiveWill`
    /// 5. `NoBeneficiaries`
    ///
    /// Once the guards pass, the will is flipped to `Executed` before any
    /// amount is computed.
    pub fn execute_will(
        &mut self,
        caller: Principal,
        will_id: WillId,
        now: Timestamp,
    ) -> Result<Settlement, RegistryError> {
        let will = self.will(will_id)?;
        self.ensure_executor(&caller)?;
        invariant_not_executed(will)?;
        invariant_active(will)?;
        invariant_has_beneficiaries(will)?;

        let policy = self.residual_policy;
        let will = self.will_mut(will_id)?;
        will.mark_executed(now)?;
        let settlement = settle(will, policy);

        let outflow = settlement.outflow();
        if outflow > self.held_balance {
            warn!(
                will_id,
                outflow,
                held_balance = self.held_balance,
                shortfall = outflow - self.held_balance,
                "Settlement exceeds held balance"
            );
        }
        self.held_balance = self.held_balance.saturating_sub(outflow);

        info!(
            will_id,
            executor = %short_principal(&caller),
            transfers = settlement.transfers.len(),
            distributed = settlement.distributed,
            residual = settlement.residual,
            "Will executed"
        );

        self.outbox.push(WillEvent::WillExecuted {
            will_id,
            executor: caller,
        });

        Ok(settlement)
    }

    /// What execution would hand out right now, without committing anything.
    pub fn preview_settlement(&self, will_id: WillId) -> Result<Settlement, RegistryError> {
        let will = self.will(will_id)?;
        invariant_not_executed(will)?;
        Ok(plan_settlement(will, self.residual_policy))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Snapshot of a will.
    pub fn get_will(&self, will_id: WillId) -> Result<WillView, RegistryError> {
        debug!(will_id, "get_will");
        self.will(will_id).map(WillView::from)
    }

    /// Snapshot of one beneficiary.
    pub fn get_beneficiary(
        &self,
        will_id: WillId,
        index: usize,
    ) -> Result<BeneficiaryView, RegistryError> {
        debug!(will_id, index, "get_beneficiary");
        let beneficiary = self.will(will_id)?.beneficiary(index)?;
        Ok(BeneficiaryView::from_entry(index, beneficiary))
    }

    /// Ids created by `testator`, oldest first.
    pub fn get_testator_wills(&self, testator: &Principal) -> Vec<WillId> {
        self.testator_wills
            .get(testator)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of beneficiaries on a will.
    pub fn beneficiary_count(&self, will_id: WillId) -> Result<usize, RegistryError> {
        Ok(self.will(will_id)?.beneficiaries().len())
    }

    /// Sum of allocations on a will.
    pub fn total_allocation(&self, will_id: WillId) -> Result<u16, RegistryError> {
        Ok(self.will(will_id)?.total_allocation())
    }

    /// Registry owner.
    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    /// Highest id issued so far (0 when empty).
    pub fn will_count(&self) -> WillId {
        self.will_counter
    }

    /// Value deposited and not yet settled or withdrawn.
    pub fn held_balance(&self) -> Amount {
        self.held_balance
    }

    /// Residual policy applied at execution.
    pub fn residual_policy(&self) -> ResidualPolicy {
        self.residual_policy
    }

    /// Owner, or carries the executor flag.
    pub fn is_authorized_executor(&self, identity: &Principal) -> bool {
        *identity == self.owner || self.executors.contains(identity)
    }

    /// Drain queued events in emission order.
    pub fn take_events(&mut self) -> Vec<WillEvent> {
        std::mem::take(&mut self.outbox)
    }
}
