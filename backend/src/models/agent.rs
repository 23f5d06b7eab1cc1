//! Agent model
//!
//! Represents one economic participant in the market. Each agent has:
//! - Cash balance (i64 cents, non-negative except transiently at the
//!   operational-cost sink, which triggers bankruptcy)
//! - Holdings: non-negative integer quantity per asset kind
//! - Energy (bounded scalar, decays each round)
//! - Alive flag (one-way true → false transition)
//!
//! Ownership discipline: agents live inside the `AgentRegistry`; only the
//! `Market` mutates cash/holdings (during trade execution) and only the
//! `RoundOrchestrator` mutates energy, applies costs, and kills.
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::asset::{AssetKind, Holdings};

/// Errors that can occur during agent balance operations
#[derive(Debug, Error, PartialEq)]
pub enum AgentError {
    #[error("Insufficient cash: required {required}, available {available}")]
    InsufficientCash { required: i64, available: i64 },

    #[error("Insufficient {kind:?} holdings: required {required}, available {available}")]
    InsufficientHoldings {
        kind: AssetKind,
        required: u32,
        available: u32,
    },
}

/// Represents one market participant
///
/// # Example
/// ```
/// use market_simulator_core_rs::{Agent, AssetKind, Holdings};
///
/// let mut agent = Agent::new(
///     "alice".to_string(),
///     10_000,
///     Holdings::new().with(AssetKind::Gold, 5),
///     10,
/// );
/// assert_eq!(agent.cash(), 10_000);
/// assert!(agent.is_alive());
///
/// agent.debit_cash(3_000).unwrap();
/// assert_eq!(agent.cash(), 7_000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Unique agent identifier (e.g., "alice")
    id: String,

    /// Cash balance (i64 cents)
    ///
    /// Trades keep this non-negative (validated against available cash).
    /// The per-round operational cost is deducted unconditionally and may
    /// drive it negative, which the orchestrator treats as bankruptcy.
    cash: i64,

    /// Asset quantities per kind
    holdings: Holdings,

    /// Energy level; reaching zero kills the agent
    energy: i32,

    /// Alive flag; transitions to false exactly once
    alive: bool,
}

impl Agent {
    /// Create a new agent
    ///
    /// # Panics
    /// Panics if `cash` or `energy` is negative: initial state comes from
    /// validated configuration.
    pub fn new(id: String, cash: i64, holdings: Holdings, energy: i32) -> Self {
        assert!(cash >= 0, "initial cash must be non-negative");
        assert!(energy >= 0, "initial energy must be non-negative");
        Self {
            id,
            cash,
            holdings,
            energy,
            alive: true,
        }
    }

    /// Get agent ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get current cash balance (i64 cents)
    pub fn cash(&self) -> i64 {
        self.cash
    }

    /// Get current holdings
    pub fn holdings(&self) -> &Holdings {
        &self.holdings
    }

    /// Get current energy
    pub fn energy(&self) -> i32 {
        self.energy
    }

    /// Whether the agent is alive
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Add cash (trade proceeds)
    pub fn credit_cash(&mut self, amount: i64) {
        debug_assert!(amount >= 0, "credit amount must be non-negative");
        self.cash += amount;
    }

    /// Remove cash; fails without state change if the balance is too low
    ///
    /// Used for the buyer leg of a trade, which the market validates against
    /// *available* cash beforehand, so a failure here indicates a bug.
    pub fn debit_cash(&mut self, amount: i64) -> Result<(), AgentError> {
        debug_assert!(amount >= 0, "debit amount must be non-negative");
        if self.cash < amount {
            return Err(AgentError::InsufficientCash {
                required: amount,
                available: self.cash,
            });
        }
        self.cash -= amount;
        Ok(())
    }

    /// Deduct an unconditional charge (operational-cost sink)
    ///
    /// Unlike `debit_cash` this may take the balance negative; the
    /// orchestrator checks for bankruptcy immediately afterwards.
    pub fn charge(&mut self, amount: i64) {
        debug_assert!(amount >= 0, "charge amount must be non-negative");
        self.cash -= amount;
    }

    /// Add asset units (trade delivery)
    pub fn add_asset(&mut self, kind: AssetKind, quantity: u32) {
        self.holdings.add(kind, quantity);
    }

    /// Remove asset units; fails without state change if holdings are too low
    pub fn remove_asset(&mut self, kind: AssetKind, quantity: u32) -> Result<(), AgentError> {
        let available = self.holdings.get(kind);
        if !self.holdings.checked_remove(kind, quantity) {
            return Err(AgentError::InsufficientHoldings {
                kind,
                required: quantity,
                available,
            });
        }
        Ok(())
    }

    /// Apply per-round energy decay
    pub fn decay_energy(&mut self, amount: i32) {
        debug_assert!(amount >= 0, "decay amount must be non-negative");
        self.energy -= amount;
    }

    /// Restore energy (survival-asset consumption), clamped to `max_energy`
    pub fn restore_energy(&mut self, amount: i32, max_energy: i32) {
        debug_assert!(amount >= 0, "recovery amount must be non-negative");
        self.energy = (self.energy + amount).min(max_energy);
    }

    /// Transition the agent to dead. One-way; idempotent.
    pub fn kill(&mut self) {
        self.alive = false;
    }
}
