//! # Settlement
//!
//! Turns a will into an ordered list of transfer instructions.
//!
//! Each unclaimed beneficiary receives `floor(total_value * pct / 100)`.
//! Shares are never rounded up and the remainder is never redistributed, so the
//! sum handed out is always `<= total_value`.

use crate::domain::{Amount, ResidualPolicy, Transfer, Will, WillId};
use serde::{Deserialize, Serialize};

/// Outcome of settling (or previewing) a will.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Settled will.
    pub will_id: WillId,
    /// Beneficiary transfers in index order. Zero amounts are omitted.
    pub transfers: Vec<Transfer>,
    /// Residual sent back to the testator under [`ResidualPolicy::ReturnToTestator`].
    pub residual_refund: Option<Transfer>,
    /// Sum of `transfers`.
    pub distributed: Amount,
    /// `total_value - distributed`.
    pub residual: Amount,
}

impl Settlement {
    /// Full ordered instruction list: beneficiaries first, then any refund.
    pub fn instructions(&self) -> Vec<Transfer> {
        self.transfers
            .iter()
            .copied()
            .chain(self.residual_refund)
            .collect()
    }

    /// Value leaving the registry's held balance.
    pub fn outflow(&self) -> Amount {
        self.distributed + self.residual_refund.map_or(0, |t| t.amount)
    }
}

/// Share of `total` owed for `percent`, truncated toward zero.
pub fn allocation_amount(total: Amount, percent: u8) -> Amount {
    let share = u128::from(total) * u128::from(percent) / 100;
    // percent <= 100, so share <= total and always fits
    share as Amount
}

/// Compute the settlement without touching the will.
pub fn plan_settlement(will: &Will, policy: ResidualPolicy) -> Settlement {
    let transfers: Vec<Transfer> = will
        .beneficiaries()
        .iter()
        .filter(|b| !b.is_claimed())
        .map(|b| {
            Transfer::new(
                *b.recipient(),
                allocation_amount(will.total_value(), b.allocation_percent()),
            )
        })
        .filter(|t| t.amount > 0)
        .collect();

    let distributed: Amount = transfers.iter().map(|t| t.amount).sum();
    let residual = will.total_value().saturating_sub(distributed);

    let residual_refund = match policy {
        ResidualPolicy::ReturnToTestator if residual > 0 => {
            Some(Transfer::new(*will.testator(), residual))
        }
        _ => None,
    };

    Settlement {
        will_id: will.id(),
        transfers,
        residual_refund,
        distributed,
        residual,
    }
}

/// Compute the settlement and mark every beneficiary claimed.
///
/// The caller must already have flipped the will to `Executed`.
pub(crate) fn settle(will: &mut Will, policy: ResidualPolicy) -> Settlement {
    let settlement = plan_settlement(will, policy);
    for beneficiary in will.beneficiaries.iter_mut() {
        beneficiary.claimed = true;
    }
    settlement
}
