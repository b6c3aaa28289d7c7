//! # Domain Invariants
//!
//! Guard functions composed at the start of each registry operation. Each one
//! either passes or returns the typed rejection; none of them mutate.

use super::entities::Will;
use super::errors::{RegistryError, Role};
use super::value_objects::{
    Principal, MAX_ALLOCATION_PERCENT, MIN_ALLOCATION_PERCENT, ZERO_PRINCIPAL,
};

/// Invariant: required strings are non-empty.
pub fn invariant_non_empty(field: &'static str, value: &str) -> Result<(), RegistryError> {
    if value.is_empty() {
        return Err(RegistryError::invalid(field, "must not be empty"));
    }
    Ok(())
}

/// Invariant: a single allocation lies in `[1, 100]`.
pub fn invariant_valid_percentage(percent: u8) -> Result<(), RegistryError> {
    if !(MIN_ALLOCATION_PERCENT..=MAX_ALLOCATION_PERCENT).contains(&percent) {
        return Err(RegistryError::invalid(
            "allocation_percent",
            format!("{percent} not in [{MIN_ALLOCATION_PERCENT}, {MAX_ALLOCATION_PERCENT}]"),
        ));
    }
    Ok(())
}

/// Invariant: recipients are never the null principal.
pub fn invariant_non_null_recipient(recipient: &Principal) -> Result<(), RegistryError> {
    if *recipient == ZERO_PRINCIPAL {
        return Err(RegistryError::invalid("recipient", "null principal"));
    }
    Ok(())
}

/// Invariant: the sum of allocations on a will never exceeds 100.
pub fn invariant_allocation_ceiling(will: &Will, requested: u8) -> Result<(), RegistryError> {
    let allocated = will.total_allocation();
    if allocated + u16::from(requested) > u16::from(MAX_ALLOCATION_PERCENT) {
        return Err(RegistryError::AllocationExceeded {
            will_id: will.id(),
            allocated,
            requested,
        });
    }
    Ok(())
}

/// Invariant: only the testator mutates a will.
pub fn invariant_is_testator(will: &Will, caller: &Principal) -> Result<(), RegistryError> {
    if will.testator() != caller {
        return Err(RegistryError::Unauthorized {
            caller: *caller,
            role: Role::Testator,
        });
    }
    Ok(())
}

/// Invariant: executed wills are frozen.
pub fn invariant_not_executed(will: &Will) -> Result<(), RegistryError> {
    if will.state().is_terminal() {
        return Err(RegistryError::AlreadyExecuted(will.id()));
    }
    Ok(())
}

/// Invariant: only active wills are executed.
pub fn invariant_active(will: &Will) -> Result<(), RegistryError> {
    if !will.is_active() {
        return Err(RegistryError::InactiveWill(will.id()));
    }
    Ok(())
}

/// Invariant: execution needs at least one beneficiary.
pub fn invariant_has_beneficiaries(will: &Will) -> Result<(), RegistryError> {
    if will.beneficiaries().is_empty() {
        return Err(RegistryError::NoBeneficiaries(will.id()));
    }
    Ok(())
}
