//! Agent registry
//!
//! Holds every agent's mutable economic state for one simulation run.
//! The registry is owned by the `Market`; nothing else holds agents, so
//! multiple isolated runs can coexist in one process.
//!
//! # Critical Invariants
//!
//! 1. **Cash Conservation**: trades move cash between agents; only the
//!    orchestrator's sinks remove it
//! 2. **Asset Conservation**: trades move assets; only consumption
//!    removes them
//! 3. **Deterministic Order**: iteration follows insertion order, so the
//!    per-round shuffle is the only source of turn-order randomness

use std::collections::HashMap;

use crate::models::agent::{Agent, AgentError};
use crate::models::asset::AssetKind;

/// All agents in one simulation run, indexed by ID
///
/// # Example
/// ```
/// use market_simulator_core_rs::{Agent, AgentRegistry, Holdings};
///
/// let registry = AgentRegistry::new(vec![
///     Agent::new("alice".to_string(), 10_000, Holdings::new(), 10),
///     Agent::new("bob".to_string(), 5_000, Holdings::new(), 10),
/// ]);
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.total_cash(), 15_000);
/// ```
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    /// Agents by ID
    agents: HashMap<String, Agent>,

    /// Agent IDs in insertion order (deterministic iteration)
    order: Vec<String>,
}

impl AgentRegistry {
    /// Create a registry from a list of agents
    ///
    /// Duplicate IDs are rejected at configuration validation; here the
    /// last one would win, so callers must validate first.
    pub fn new(agents: Vec<Agent>) -> Self {
        let order: Vec<String> = agents.iter().map(|a| a.id().to_string()).collect();
        let agents = agents
            .into_iter()
            .map(|a| (a.id().to_string(), a))
            .collect();
        Self { agents, order }
    }

    /// Get reference to an agent by ID
    pub fn get(&self, id: &str) -> Option<&Agent> {
        self.agents.get(id)
    }

    /// Get mutable reference to an agent by ID
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Agent> {
        self.agents.get_mut(id)
    }

    /// Whether an agent with this ID exists
    pub fn contains(&self, id: &str) -> bool {
        self.agents.contains_key(id)
    }

    /// Number of agents
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Agent IDs in insertion order
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Agents in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.order.iter().map(move |id| &self.agents[id])
    }

    /// Number of living agents
    pub fn living_count(&self) -> usize {
        self.iter().filter(|a| a.is_alive()).count()
    }

    /// Total cash across all agents (alive or dead)
    ///
    /// Used by the conservation audit: this plus the cumulative
    /// operational-cost sink must equal the initial total.
    pub fn total_cash(&self) -> i64 {
        self.iter().map(|a| a.cash()).sum()
    }

    /// Total units of one asset kind across all agents
    pub fn total_asset(&self, kind: AssetKind) -> u64 {
        self.iter().map(|a| a.holdings().get(kind) as u64).sum()
    }

    /// Move cash between two agents
    ///
    /// Debits first; if the debit fails no credit occurs. The market
    /// validates available cash beforehand, so a failure indicates a bug
    /// upstream, never a partial transfer.
    pub fn transfer_cash(&mut self, from: &str, to: &str, amount: i64) -> Result<(), AgentError> {
        debug_assert!(from != to, "self-transfer is rejected at the market");
        self.agents
            .get_mut(from)
            .expect("transfer_cash: sender validated by market")
            .debit_cash(amount)?;
        self.agents
            .get_mut(to)
            .expect("transfer_cash: receiver validated by market")
            .credit_cash(amount);
        Ok(())
    }

    /// Move asset units between two agents
    ///
    /// Removal first; if it fails no delivery occurs.
    pub fn transfer_asset(
        &mut self,
        from: &str,
        to: &str,
        kind: AssetKind,
        quantity: u32,
    ) -> Result<(), AgentError> {
        debug_assert!(from != to, "self-transfer is rejected at the market");
        self.agents
            .get_mut(from)
            .expect("transfer_asset: sender validated by market")
            .remove_asset(kind, quantity)?;
        self.agents
            .get_mut(to)
            .expect("transfer_asset: receiver validated by market")
            .add_asset(kind, quantity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::asset::Holdings;

    fn registry() -> AgentRegistry {
        AgentRegistry::new(vec![
            Agent::new(
                "alice".to_string(),
                1_000,
                Holdings::new().with(AssetKind::Gold, 3),
                10,
            ),
            Agent::new("bob".to_string(), 500, Holdings::new(), 10),
        ])
    }

    #[test]
    fn test_totals() {
        let r = registry();
        assert_eq!(r.total_cash(), 1_500);
        assert_eq!(r.total_asset(AssetKind::Gold), 3);
        assert_eq!(r.total_asset(AssetKind::Apple), 0);
    }

    #[test]
    fn test_transfer_cash_conserves_total() {
        let mut r = registry();
        r.transfer_cash("alice", "bob", 400).unwrap();
        assert_eq!(r.get("alice").unwrap().cash(), 600);
        assert_eq!(r.get("bob").unwrap().cash(), 900);
        assert_eq!(r.total_cash(), 1_500);
    }

    #[test]
    fn test_transfer_cash_failure_no_partial_state() {
        let mut r = registry();
        assert!(r.transfer_cash("bob", "alice", 600).is_err());
        assert_eq!(r.get("alice").unwrap().cash(), 1_000);
        assert_eq!(r.get("bob").unwrap().cash(), 500);
    }

    #[test]
    fn test_transfer_asset() {
        let mut r = registry();
        r.transfer_asset("alice", "bob", AssetKind::Gold, 2).unwrap();
        assert_eq!(r.get("alice").unwrap().holdings().get(AssetKind::Gold), 1);
        assert_eq!(r.get("bob").unwrap().holdings().get(AssetKind::Gold), 2);
        assert_eq!(r.total_asset(AssetKind::Gold), 3);
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let r = registry();
        assert_eq!(r.ids(), &["alice".to_string(), "bob".to_string()]);
    }
}
