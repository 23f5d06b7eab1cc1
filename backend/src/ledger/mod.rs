//! Trade ledger
//!
//! Append-only, ordered record of all executed trades in one run. The
//! ledger is written only by the `Market` (on offer acceptance) and read
//! by the decision layer (recent tail) and by after-the-fact analytics.
//!
//! # Critical Invariants
//!
//! - **Immutability**: a record is never modified after append
//! - **Sequencing**: `sequence` equals the record's append position;
//!   `id` is monotonic and never reused
//!
//! Durable form: one JSON object per line (`export_jsonl`), the run's
//! audit artifact.

pub mod snapshot;

use std::io::Write;

use crate::models::asset::AssetKind;
use crate::models::trade::Trade;

pub use snapshot::{InventorySnapshot, InventorySnapshotStore};

/// Append-only store of executed trades
///
/// # Example
/// ```
/// use market_simulator_core_rs::{AssetKind, Ledger};
///
/// let mut ledger = Ledger::new();
/// let trade = ledger.record("bob", "alice", AssetKind::Gold, 5, 1000, 0);
/// assert_eq!(trade.id, 1);
/// assert_eq!(trade.sequence, 0);
/// assert_eq!(ledger.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    trades: Vec<Trade>,
    next_trade_id: u64,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            trades: Vec::new(),
            next_trade_id: 1,
        }
    }

    /// Append a trade, assigning its id and sequence number
    ///
    /// Returns a copy of the stored record.
    pub fn record(
        &mut self,
        buyer_id: &str,
        seller_id: &str,
        kind: AssetKind,
        quantity: u32,
        unit_price: i64,
        round: usize,
    ) -> Trade {
        let trade = Trade {
            id: self.next_trade_id,
            buyer_id: buyer_id.to_string(),
            seller_id: seller_id.to_string(),
            kind,
            quantity,
            unit_price,
            round,
            sequence: self.trades.len() as u64,
        };
        self.next_trade_id += 1;
        self.trades.push(trade.clone());
        trade
    }

    /// Number of recorded trades
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    /// Whether no trades have executed
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// All trades, in sequence order
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// The most recent `n` trades, oldest first
    ///
    /// This is the ledger tail exposed to the decision layer.
    pub fn recent(&self, n: usize) -> &[Trade] {
        let start = self.trades.len().saturating_sub(n);
        &self.trades[start..]
    }

    /// Write the ledger as JSON Lines
    ///
    /// A write failure here is structural: the caller aborts the run.
    pub fn export_jsonl<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for trade in &self.trades {
            let line = serde_json::to_string(trade).map_err(std::io::Error::other)?;
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_matches_append_order() {
        let mut ledger = Ledger::new();
        for i in 0..3 {
            let t = ledger.record("b", "s", AssetKind::Apple, 1, 100, i);
            assert_eq!(t.sequence, i as u64);
            assert_eq!(t.id, i as u64 + 1);
        }
    }

    #[test]
    fn test_recent_tail() {
        let mut ledger = Ledger::new();
        for _ in 0..5 {
            ledger.record("b", "s", AssetKind::Chip, 1, 100, 0);
        }
        assert_eq!(ledger.recent(2).len(), 2);
        assert_eq!(ledger.recent(2)[0].sequence, 3);
        assert_eq!(ledger.recent(10).len(), 5);
    }

    #[test]
    fn test_export_jsonl_one_line_per_trade() {
        let mut ledger = Ledger::new();
        ledger.record("b", "s", AssetKind::Gold, 2, 500, 1);
        ledger.record("s", "b", AssetKind::Apple, 1, 50, 2);

        let mut buf = Vec::new();
        ledger.export_jsonl(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().next().unwrap().contains("\"gold\""));
    }
}
