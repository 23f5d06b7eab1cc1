//! Integration tests for agent balance operations
//!
//! Validates the balance discipline the market and orchestrator rely on:
//! checked trade legs never partially apply, the operational-cost charge
//! is the only path to a negative balance, and death is one-way.

use market_simulator_core_rs::{Agent, AgentError, AssetKind, Holdings};

fn agent(cash: i64, energy: i32) -> Agent {
    Agent::new(
        "alice".to_string(),
        cash,
        Holdings::new().with(AssetKind::Gold, 3),
        energy,
    )
}

#[test]
fn test_credit_and_debit_cash() {
    let mut a = agent(1_000, 10);
    a.credit_cash(500);
    assert_eq!(a.cash(), 1_500);
    a.debit_cash(1_500).unwrap();
    assert_eq!(a.cash(), 0);
}

#[test]
fn test_debit_failure_leaves_balance_untouched() {
    let mut a = agent(100, 10);
    let err = a.debit_cash(101).unwrap_err();
    assert_eq!(
        err,
        AgentError::InsufficientCash {
            required: 101,
            available: 100
        }
    );
    assert_eq!(a.cash(), 100);
}

#[test]
fn test_charge_is_unconditional() {
    // The per-turn operational cost is the one deduction that may take
    // cash negative; bankruptcy detection happens at the orchestrator.
    let mut a = agent(30, 10);
    a.charge(100);
    assert_eq!(a.cash(), -70);
}

#[test]
fn test_asset_add_remove() {
    let mut a = agent(0, 10);
    a.add_asset(AssetKind::Apple, 2);
    assert_eq!(a.holdings().get(AssetKind::Apple), 2);
    a.remove_asset(AssetKind::Apple, 2).unwrap();
    assert_eq!(a.holdings().get(AssetKind::Apple), 0);
}

#[test]
fn test_remove_asset_failure_leaves_holdings_untouched() {
    let mut a = agent(0, 10);
    let err = a.remove_asset(AssetKind::Gold, 4).unwrap_err();
    assert_eq!(
        err,
        AgentError::InsufficientHoldings {
            kind: AssetKind::Gold,
            required: 4,
            available: 3
        }
    );
    assert_eq!(a.holdings().get(AssetKind::Gold), 3);
}

#[test]
fn test_energy_decay_and_clamped_restore() {
    let mut a = agent(0, 4);
    a.decay_energy(1);
    assert_eq!(a.energy(), 3);

    // Recovery clamps at max_energy, never overshoots.
    a.restore_energy(3, 5);
    assert_eq!(a.energy(), 5);

    // Decay may pass zero; the orchestrator kills at <= 0.
    a.decay_energy(6);
    assert_eq!(a.energy(), -1);
}

#[test]
fn test_kill_is_one_way_and_idempotent() {
    let mut a = agent(0, 10);
    assert!(a.is_alive());
    a.kill();
    assert!(!a.is_alive());
    a.kill();
    assert!(!a.is_alive());
}

#[test]
#[should_panic(expected = "initial cash must be non-negative")]
fn test_negative_initial_cash_panics() {
    Agent::new("a".to_string(), -1, Holdings::new(), 10);
}
