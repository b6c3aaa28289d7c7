//! In-memory value ledger.
//!
//! Keeps a balance per principal and can be told to refuse specific
//! recipients, which is how failed transfers are exercised in tests and in
//! the demo node.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{short_principal, Amount, LedgerError, Principal, Transfer};
use crate::ports::ValueLedger;

/// Ledger backed by a balance map.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<Principal, Amount>>,
    rejecting: RwLock<HashSet<Principal>>,
}

impl InMemoryLedger {
    /// Empty ledger accepting every recipient.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: refuse transfers to `recipient`.
    pub fn with_rejecting(self, recipient: Principal) -> Self {
        self.reject(recipient);
        self
    }

    /// Refuse transfers to `recipient` from now on.
    pub fn reject(&self, recipient: Principal) {
        self.rejecting.write().insert(recipient);
    }

    /// Accept transfers to `recipient` again.
    pub fn accept(&self, recipient: &Principal) {
        self.rejecting.write().remove(recipient);
    }

    /// Current balance of `principal`.
    pub fn balance_of(&self, principal: &Principal) -> Amount {
        self.balances.read().get(principal).copied().unwrap_or(0)
    }

    /// Sum of all balances.
    pub fn total_credited(&self) -> Amount {
        self.balances.read().values().sum()
    }
}

#[async_trait]
impl ValueLedger for InMemoryLedger {
    async fn transfer(&self, transfer: &Transfer) -> Result<(), LedgerError> {
        if self.rejecting.read().contains(&transfer.recipient) {
            return Err(LedgerError::RecipientRejected(transfer.recipient));
        }

        let mut balances = self.balances.write();
        let balance = balances.entry(transfer.recipient).or_insert(0);
        *balance = balance
            .checked_add(transfer.amount)
            .ok_or(LedgerError::BalanceOverflow(transfer.recipient))?;

        debug!(
            recipient = %short_principal(&transfer.recipient),
            amount = transfer.amount,
            balance = *balance,
            "Ledger credit"
        );
        Ok(())
    }
}
