//! Inventory snapshots
//!
//! Point-in-time, per-round copies of every agent's balances for audit
//! and analytics. Captured during the settlement phase for all agents,
//! alive or dead, so the history stays continuous after deaths.
//!
//! Records are immutable once appended.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::models::asset::Holdings;
use crate::models::registry::AgentRegistry;

/// One agent's balances at the end of one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Round the snapshot was taken at
    pub round: usize,

    /// Agent ID
    pub agent_id: String,

    /// Cash balance (cents)
    pub cash: i64,

    /// Asset quantities per kind
    pub holdings: Holdings,

    /// Energy level
    pub energy: i32,

    /// Alive flag
    pub alive: bool,
}

/// Append-only store of per-round inventory snapshots
///
/// # Example
/// ```
/// use market_simulator_core_rs::{Agent, AgentRegistry, Holdings, InventorySnapshotStore};
///
/// let registry = AgentRegistry::new(vec![
///     Agent::new("alice".to_string(), 1_000, Holdings::new(), 10),
/// ]);
///
/// let mut store = InventorySnapshotStore::new();
/// store.capture_all(&registry, 0);
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InventorySnapshotStore {
    snapshots: Vec<InventorySnapshot>,
}

impl InventorySnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a snapshot of every agent (alive or not)
    ///
    /// Returns the number of snapshots appended.
    pub fn capture_all(&mut self, registry: &AgentRegistry, round: usize) -> usize {
        let mut captured = 0;
        for agent in registry.iter() {
            self.snapshots.push(InventorySnapshot {
                round,
                agent_id: agent.id().to_string(),
                cash: agent.cash(),
                holdings: *agent.holdings(),
                energy: agent.energy(),
                alive: agent.is_alive(),
            });
            captured += 1;
        }
        captured
    }

    /// Number of snapshots stored
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// All snapshots, in capture order
    pub fn snapshots(&self) -> &[InventorySnapshot] {
        &self.snapshots
    }

    /// Snapshots from one round
    pub fn for_round(&self, round: usize) -> Vec<&InventorySnapshot> {
        self.snapshots.iter().filter(|s| s.round == round).collect()
    }

    /// One agent's history across rounds
    pub fn for_agent(&self, agent_id: &str) -> Vec<&InventorySnapshot> {
        self.snapshots
            .iter()
            .filter(|s| s.agent_id == agent_id)
            .collect()
    }

    /// Write the snapshot history as JSON Lines
    ///
    /// A write failure here is structural: the caller aborts the run.
    pub fn export_jsonl<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot).map_err(std::io::Error::other)?;
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::agent::Agent;
    use crate::models::asset::AssetKind;

    fn registry() -> AgentRegistry {
        AgentRegistry::new(vec![
            Agent::new(
                "alice".to_string(),
                1_000,
                Holdings::new().with(AssetKind::Apple, 2),
                10,
            ),
            Agent::new("bob".to_string(), 500, Holdings::new(), 7),
        ])
    }

    #[test]
    fn test_capture_all_includes_every_agent() {
        let mut r = registry();
        r.get_mut("bob").unwrap().kill();

        let mut store = InventorySnapshotStore::new();
        let captured = store.capture_all(&r, 3);

        assert_eq!(captured, 2);
        let bob = &store.for_agent("bob")[0];
        assert!(!bob.alive, "dead agents are still snapshotted");
        assert_eq!(bob.round, 3);
    }

    #[test]
    fn test_history_accumulates_per_round() {
        let r = registry();
        let mut store = InventorySnapshotStore::new();
        store.capture_all(&r, 0);
        store.capture_all(&r, 1);

        assert_eq!(store.len(), 4);
        assert_eq!(store.for_round(1).len(), 2);
        assert_eq!(store.for_agent("alice").len(), 2);
    }
}
