//! # Registry Scenarios
//!
//! End-to-end walks through the registry state machine, including the
//! attempts a hostile caller would make.
//!
//! ## Test Categories
//!
//! 1. **Lifecycle** - create, populate, execute
//! 2. **Authorization Attacks** - wrong testator, wrong executor, wrong owner
//! 3. **Freeze After Execution** - nothing moves once settled
//! 4. **Residual Handling** - stranded vs returned

use will_registry::{
    AddBeneficiaryRequest, CreateWillRequest, Principal, RegistryError, ResidualPolicy, Role,
    Transfer, WillEvent, WillRegistry,
};

// =============================================================================
// TEST HELPERS
// =============================================================================

const OWNER: Principal = [0xEE; 20];
const TESTATOR: Principal = [0x01; 20];
const OTHER_TESTATOR: Principal = [0x02; 20];
const HEIR_A: Principal = [0xA1; 20];
const HEIR_B: Principal = [0xB0; 20];
const EXECUTOR: Principal = [0xE1; 20];
const MALLORY: Principal = [0x66; 20];
const NOW: u64 = 1_700_000_000;

fn create(registry: &mut WillRegistry, testator: Principal, value: u64) -> u64 {
    registry
        .create_will(
            testator,
            CreateWillRequest {
                testator_name: "Theodora".into(),
                execution_conditions: "upon death certificate".into(),
                deposited_value: value,
            },
            NOW,
        )
        .unwrap()
}

fn heir(will_id: u64, recipient: Principal, pct: u8) -> AddBeneficiaryRequest {
    AddBeneficiaryRequest {
        will_id,
        recipient,
        name: "heir".into(),
        allocation_percent: pct,
        asset_description: "share of estate".into(),
    }
}

// =============================================================================
// 1. LIFECYCLE
// =============================================================================

#[test]
fn test_full_lifecycle_sixty_forty() {
    let mut registry = WillRegistry::new(OWNER);
    let id = create(&mut registry, TESTATOR, 1000);

    assert_eq!(registry.add_beneficiary(TESTATOR, heir(id, HEIR_A, 60)), Ok(0));
    assert!(matches!(
        registry.add_beneficiary(TESTATOR, heir(id, HEIR_B, 50)),
        Err(RegistryError::AllocationExceeded { .. })
    ));
    assert_eq!(registry.add_beneficiary(TESTATOR, heir(id, HEIR_B, 40)), Ok(1));

    let settlement = registry.execute_will(OWNER, id, NOW + 60).unwrap();
    assert_eq!(
        settlement.instructions(),
        vec![Transfer::new(HEIR_A, 600), Transfer::new(HEIR_B, 400)]
    );
    assert_eq!(settlement.residual, 0);

    let events = registry.take_events();
    let names: Vec<&str> = events.iter().map(WillEvent::name).collect();
    assert_eq!(
        names,
        vec![
            "WillCreated",
            "BeneficiaryAdded",
            "BeneficiaryAdded",
            "WillExecuted"
        ]
    );
}

#[test]
fn test_wills_are_tracked_per_testator() {
    let mut registry = WillRegistry::new(OWNER);
    let a = create(&mut registry, TESTATOR, 10);
    let b = create(&mut registry, OTHER_TESTATOR, 10);
    let c = create(&mut registry, TESTATOR, 10);

    assert_eq!(registry.get_testator_wills(&TESTATOR), vec![a, c]);
    assert_eq!(registry.get_testator_wills(&OTHER_TESTATOR), vec![b]);
    assert!(registry.get_testator_wills(&MALLORY).is_empty());
    assert_eq!(registry.will_count(), 3);
}

#[test]
fn test_deactivate_is_reversible_and_idempotent() {
    let mut registry = WillRegistry::new(OWNER);
    let id = create(&mut registry, TESTATOR, 100);
    registry
        .add_beneficiary(TESTATOR, heir(id, HEIR_A, 100))
        .unwrap();

    registry.deactivate_will(TESTATOR, id).unwrap();
    registry.deactivate_will(TESTATOR, id).unwrap();
    assert!(!registry.get_will(id).unwrap().is_active);

    registry.reactivate_will(TESTATOR, id).unwrap();
    registry.reactivate_will(TESTATOR, id).unwrap();
    assert!(registry.get_will(id).unwrap().is_active);

    assert!(registry.execute_will(OWNER, id, NOW).is_ok());
}

#[test]
fn test_beneficiary_may_be_added_while_inactive() {
    let mut registry = WillRegistry::new(OWNER);
    let id = create(&mut registry, TESTATOR, 100);
    registry.deactivate_will(TESTATOR, id).unwrap();
    assert_eq!(registry.add_beneficiary(TESTATOR, heir(id, HEIR_A, 10)), Ok(0));
}

// =============================================================================
// 2. AUTHORIZATION ATTACKS
// =============================================================================

#[test]
fn test_attack_add_beneficiary_to_foreign_will() {
    let mut registry = WillRegistry::new(OWNER);
    let id = create(&mut registry, TESTATOR, 1000);

    let err = registry
        .add_beneficiary(MALLORY, heir(id, MALLORY, 100))
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::Unauthorized {
            caller: MALLORY,
            role: Role::Testator
        }
    );
    assert_eq!(registry.beneficiary_count(id).unwrap(), 0);
}

#[test]
fn test_attack_owner_cannot_edit_wills() {
    let mut registry = WillRegistry::new(OWNER);
    let id = create(&mut registry, TESTATOR, 1000);
    assert!(registry.add_beneficiary(OWNER, heir(id, OWNER, 10)).is_err());
    assert!(registry.deactivate_will(OWNER, id).is_err());
}

#[test]
fn test_attack_unauthorized_execution_leaves_draft() {
    let mut registry = WillRegistry::new(OWNER);
    let id = create(&mut registry, TESTATOR, 1000);
    registry
        .add_beneficiary(TESTATOR, heir(id, HEIR_A, 100))
        .unwrap();

    // The testator is not an executor either.
    for caller in [MALLORY, TESTATOR, HEIR_A] {
        assert!(matches!(
            registry.execute_will(caller, id, NOW),
            Err(RegistryError::Unauthorized {
                role: Role::Executor,
                ..
            })
        ));
    }
    assert!(!registry.get_will(id).unwrap().is_executed);
}

#[test]
fn test_attack_self_authorization() {
    let mut registry = WillRegistry::new(OWNER);
    assert!(registry.authorize_executor(MALLORY, MALLORY).is_err());
    assert!(!registry.is_authorized_executor(&MALLORY));

    registry.authorize_executor(OWNER, EXECUTOR).unwrap();
    // An executor cannot appoint further executors.
    assert!(registry.authorize_executor(EXECUTOR, MALLORY).is_err());
    assert!(registry.revoke_executor(EXECUTOR, OWNER).is_err());
}

#[test]
fn test_attack_emergency_withdraw_by_non_owner() {
    let mut registry = WillRegistry::new(OWNER);
    create(&mut registry, TESTATOR, 500);
    registry.authorize_executor(OWNER, EXECUTOR).unwrap();

    for caller in [MALLORY, TESTATOR, EXECUTOR] {
        assert!(matches!(
            registry.emergency_withdraw(caller),
            Err(RegistryError::Unauthorized {
                role: Role::Owner,
                ..
            })
        ));
    }
    assert_eq!(registry.held_balance(), 500);
}

// =============================================================================
// 3. FREEZE AFTER EXECUTION
// =============================================================================

#[test]
fn test_settled_will_rejects_everything() {
    let mut registry = WillRegistry::new(OWNER);
    let id = create(&mut registry, TESTATOR, 1000);
    registry
        .add_beneficiary(TESTATOR, heir(id, HEIR_A, 50))
        .unwrap();
    registry.authorize_executor(OWNER, EXECUTOR).unwrap();
    registry.execute_will(EXECUTOR, id, NOW).unwrap();

    let before = registry.get_will(id).unwrap();

    assert_eq!(
        registry.execute_will(OWNER, id, NOW + 1),
        Err(RegistryError::AlreadyExecuted(id))
    );
    assert_eq!(
        registry.add_beneficiary(TESTATOR, heir(id, HEIR_B, 10)),
        Err(RegistryError::AlreadyExecuted(id))
    );
    assert_eq!(
        registry.reactivate_will(TESTATOR, id),
        Err(RegistryError::AlreadyExecuted(id))
    );
    assert_eq!(
        registry.preview_settlement(id),
        Err(RegistryError::AlreadyExecuted(id))
    );

    assert_eq!(registry.get_will(id).unwrap(), before);
}

#[test]
fn test_empty_will_cannot_execute() {
    let mut registry = WillRegistry::new(OWNER);
    let id = create(&mut registry, TESTATOR, 1000);
    assert_eq!(
        registry.execute_will(OWNER, id, NOW),
        Err(RegistryError::NoBeneficiaries(id))
    );
    assert!(!registry.get_will(id).unwrap().is_executed);
    assert_eq!(registry.held_balance(), 1000);
}

// =============================================================================
// 4. RESIDUAL HANDLING
// =============================================================================

#[test]
fn test_rounding_remainders_stay_in_registry() {
    let mut registry = WillRegistry::new(OWNER);
    let id = create(&mut registry, TESTATOR, 10);
    for recipient in [HEIR_A, HEIR_B, EXECUTOR] {
        registry
            .add_beneficiary(TESTATOR, heir(id, recipient, 33))
            .unwrap();
    }

    let settlement = registry.execute_will(OWNER, id, NOW).unwrap();
    assert_eq!(settlement.transfers.len(), 3);
    assert!(settlement.transfers.iter().all(|t| t.amount == 3));
    assert_eq!(settlement.residual, 1);
    assert_eq!(registry.held_balance(), 1);

    let withdrawal = registry.emergency_withdraw(OWNER).unwrap();
    assert_eq!(withdrawal, Transfer::new(OWNER, 1));
    assert_eq!(registry.held_balance(), 0);
}

#[test]
fn test_residual_returned_to_testator() {
    let mut registry = WillRegistry::with_policy(OWNER, ResidualPolicy::ReturnToTestator);
    let id = create(&mut registry, TESTATOR, 1000);
    registry
        .add_beneficiary(TESTATOR, heir(id, HEIR_A, 60))
        .unwrap();

    let settlement = registry.execute_will(OWNER, id, NOW).unwrap();
    assert_eq!(
        settlement.instructions(),
        vec![Transfer::new(HEIR_A, 600), Transfer::new(TESTATOR, 400)]
    );
    assert_eq!(registry.held_balance(), 0);
}

#[test]
fn test_full_allocation_returns_nothing() {
    let mut registry = WillRegistry::with_policy(OWNER, ResidualPolicy::ReturnToTestator);
    let id = create(&mut registry, TESTATOR, 1000);
    registry
        .add_beneficiary(TESTATOR, heir(id, HEIR_A, 100))
        .unwrap();

    let settlement = registry.execute_will(OWNER, id, NOW).unwrap();
    assert!(settlement.residual_refund.is_none());
}
