//! # Will Registry Service
//!
//! Wires the registry state machine to its driven ports.
//!
//! Each mutation runs under the registry write lock as one validate-then-commit
//! step. Events and ledger transfers are dispatched only after that lock is
//! released, so no registry guard ever lives across an `.await`.
//!
//! Commit and publication are serialized by an async ordering lock: a
//! transition's events reach the publisher before the next transition
//! commits, so subscribers see events in commit order even when the publisher
//! is slow. Ledger transfers run outside the ordering lock.
//!
//! Transfers are best-effort: a refused instruction is recorded in the report
//! and logged, the remaining instructions are still attempted and nothing is
//! rolled back or retried.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::algorithms::Settlement;
use crate::config::RegistryConfig;
use crate::domain::{
    short_principal, Amount, BeneficiaryView, Principal, RegistryError, Transfer, WillEvent,
    WillId, WillView,
};
use crate::ports::inbound::{
    SettlementReport, TransferFailure, WillRegistryApi, WithdrawalReport,
};
use crate::ports::outbound::{TimeSource, ValueLedger, WillEventPublisher};
use crate::registry::{AddBeneficiaryRequest, CreateWillRequest, WillRegistry};

/// Counters kept by the service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Operations that committed.
    pub committed_operations: u64,
    /// Operations rejected by a guard.
    pub rejected_operations: u64,
    /// Wills executed.
    pub wills_executed: u64,
    /// Transfers the ledger accepted.
    pub transfers_delivered: u64,
    /// Transfers the ledger refused.
    pub transfers_failed: u64,
    /// Events handed to the publisher.
    pub events_published: u64,
}

/// Registry service over a ledger, an event publisher and a clock.
pub struct WillRegistryService<L, P, T>
where
    L: ValueLedger,
    P: WillEventPublisher,
    T: TimeSource,
{
    registry: Arc<RwLock<WillRegistry>>,
    ledger: Arc<L>,
    publisher: Arc<P>,
    time: Arc<T>,
    stats: Arc<RwLock<ServiceStats>>,
    /// Held from commit until the transition's events are published.
    publish_order: Mutex<()>,
}

impl<L, P, T> WillRegistryService<L, P, T>
where
    L: ValueLedger,
    P: WillEventPublisher,
    T: TimeSource,
{
    /// Create a service with an empty registry owned by `owner`.
    pub fn new(
        owner: Principal,
        config: &RegistryConfig,
        ledger: Arc<L>,
        publisher: Arc<P>,
        time: Arc<T>,
    ) -> Self {
        info!(
            owner = %short_principal(&owner),
            residual_policy = ?config.residual_policy,
            "Will registry service started"
        );

        Self {
            registry: Arc::new(RwLock::new(WillRegistry::with_policy(
                owner,
                config.residual_policy,
            ))),
            ledger,
            publisher,
            time,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
            publish_order: Mutex::new(()),
        }
    }

    /// Snapshot of the service counters.
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Registry owner.
    pub fn owner(&self) -> Principal {
        *self.registry.read().owner()
    }

    /// Highest will id issued.
    pub fn will_count(&self) -> WillId {
        self.registry.read().will_count()
    }

    /// Value deposited and not yet paid out or withdrawn.
    pub fn held_balance(&self) -> Amount {
        self.registry.read().held_balance()
    }

    /// Whether `identity` may execute wills.
    pub fn is_authorized_executor(&self, identity: &Principal) -> bool {
        self.registry.read().is_authorized_executor(identity)
    }

    /// Number of beneficiaries on a will.
    pub fn beneficiary_count(&self, will_id: WillId) -> Result<usize, RegistryError> {
        self.registry.read().beneficiary_count(will_id)
    }

    /// Sum of allocations on a will.
    pub fn total_allocation(&self, will_id: WillId) -> Result<u16, RegistryError> {
        self.registry.read().total_allocation(will_id)
    }

    /// Run one transition under the write lock and drain its events.
    fn commit<R>(
        &self,
        operation: &'static str,
        caller: &Principal,
        transition: impl FnOnce(&mut WillRegistry) -> Result<R, RegistryError>,
    ) -> (Result<R, RegistryError>, Vec<WillEvent>) {
        let (result, events) = {
            let mut registry = self.registry.write();
            let result = transition(&mut registry);
            (result, registry.take_events())
        };

        let mut stats = self.stats.write();
        match &result {
            Ok(_) => stats.committed_operations += 1,
            Err(error) => {
                stats.rejected_operations += 1;
                warn!(
                    operation,
                    caller = %short_principal(caller),
                    %error,
                    "Operation rejected"
                );
            }
        }

        (result, events)
    }

    /// Commit a transition and publish its events before the next one can
    /// commit, so subscribers observe events in commit order.
    async fn apply<R: Send>(
        &self,
        operation: &'static str,
        caller: &Principal,
        transition: impl FnOnce(&mut WillRegistry) -> Result<R, RegistryError> + Send,
    ) -> Result<R, RegistryError> {
        let _order = self.publish_order.lock().await;
        let (result, events) = self.commit(operation, caller, transition);
        self.publish_all(events).await;
        result
    }

    async fn publish_all(&self, events: Vec<WillEvent>) {
        let count = events.len() as u64;
        for event in events {
            let receivers = self.publisher.publish(event).await;
            debug!(receivers, "Will event dispatched");
        }
        self.stats.write().events_published += count;
    }

    async fn dispatch(&self, transfer: Transfer) -> Result<(), TransferFailure> {
        match self.ledger.transfer(&transfer).await {
            Ok(()) => {
                self.stats.write().transfers_delivered += 1;
                Ok(())
            }
            Err(e) => {
                self.stats.write().transfers_failed += 1;
                warn!(
                    recipient = %short_principal(&transfer.recipient),
                    amount = transfer.amount,
                    error = %e,
                    "Transfer failed"
                );
                Err(TransferFailure {
                    transfer,
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn dispatch_settlement(&self, settlement: Settlement) -> SettlementReport {
        let mut delivered = Vec::new();
        let mut failures = Vec::new();

        for transfer in settlement.instructions() {
            match self.dispatch(transfer).await {
                Ok(()) => delivered.push(transfer),
                Err(failure) => failures.push(failure),
            }
        }

        SettlementReport {
            settlement,
            delivered,
            failures,
        }
    }
}

#[async_trait]
impl<L, P, T> WillRegistryApi for WillRegistryService<L, P, T>
where
    L: ValueLedger,
    P: WillEventPublisher,
    T: TimeSource,
{
    async fn create_will(
        &self,
        caller: Principal,
        request: CreateWillRequest,
    ) -> Result<WillId, RegistryError> {
        let now = self.time.now();
        self.apply("create_will", &caller, |registry| {
            registry.create_will(caller, request, now)
        })
        .await
    }

    async fn add_beneficiary(
        &self,
        caller: Principal,
        request: AddBeneficiaryRequest,
    ) -> Result<usize, RegistryError> {
        self.apply("add_beneficiary", &caller, |registry| {
            registry.add_beneficiary(caller, request)
        })
        .await
    }

    async fn deactivate_will(
        &self,
        caller: Principal,
        will_id: WillId,
    ) -> Result<(), RegistryError> {
        self.apply("deactivate_will", &caller, |registry| {
            registry.deactivate_will(caller, will_id)
        })
        .await
    }

    async fn reactivate_will(
        &self,
        caller: Principal,
        will_id: WillId,
    ) -> Result<(), RegistryError> {
        self.apply("reactivate_will", &caller, |registry| {
            registry.reactivate_will(caller, will_id)
        })
        .await
    }

    async fn execute_will(
        &self,
        caller: Principal,
        will_id: WillId,
    ) -> Result<SettlementReport, RegistryError> {
        let now = self.time.now();
        let settlement = self.apply("execute_will", &caller, |registry| {
            registry.execute_will(caller, will_id, now)
        })
        .await?;
        self.stats.write().wills_executed += 1;

        let report = self.dispatch_settlement(settlement).await;
        if !report.is_complete() {
            warn!(
                will_id,
                failed = report.failures.len(),
                delivered = report.delivered.len(),
                "Settlement partially delivered"
            );
        }
        Ok(report)
    }

    async fn authorize_executor(
        &self,
        caller: Principal,
        executor: Principal,
    ) -> Result<(), RegistryError> {
        self.apply("authorize_executor", &caller, |registry| {
            registry.authorize_executor(caller, executor)
        })
        .await
    }

    async fn revoke_executor(
        &self,
        caller: Principal,
        executor: Principal,
    ) -> Result<(), RegistryError> {
        self.apply("revoke_executor", &caller, |registry| {
            registry.revoke_executor(caller, executor)
        })
        .await
    }

    async fn emergency_withdraw(
        &self,
        caller: Principal,
    ) -> Result<WithdrawalReport, RegistryError> {
        let transfer = self.apply("emergency_withdraw", &caller, |registry| {
            registry.emergency_withdraw(caller)
        })
        .await?;
        let failure = if transfer.amount == 0 {
            debug!("Nothing to withdraw");
            None
        } else {
            self.dispatch(transfer).await.err()
        };

        Ok(WithdrawalReport { transfer, failure })
    }

    fn get_will(&self, will_id: WillId) -> Result<WillView, RegistryError> {
        self.registry.read().get_will(will_id)
    }

    fn get_beneficiary(
        &self,
        will_id: WillId,
        index: usize,
    ) -> Result<BeneficiaryView, RegistryError> {
        self.registry.read().get_beneficiary(will_id, index)
    }

    fn get_testator_wills(&self, testator: &Principal) -> Vec<WillId> {
        self.registry.read().get_testator_wills(testator)
    }

    fn preview_settlement(&self, will_id: WillId) -> Result<Settlement, RegistryError> {
        self.registry.read().preview_settlement(will_id)
    }
}
