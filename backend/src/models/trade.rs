//! Trade record
//!
//! The immutable result of a filled offer: cash moved buyer → seller,
//! assets moved seller → buyer. Records are appended to the `Ledger` and
//! never modified afterwards.
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};

use crate::models::asset::AssetKind;

/// One executed trade
///
/// Plain record with public fields, serialized as one JSONL line in the
/// persisted ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier (monotonic, 1-based)
    pub id: u64,

    /// Agent that received the assets and paid cash
    pub buyer_id: String,

    /// Agent that delivered the assets and received cash
    pub seller_id: String,

    /// Asset kind traded
    pub kind: AssetKind,

    /// Quantity moved (full offer quantity)
    pub quantity: u32,

    /// Unit price (cents)
    pub unit_price: i64,

    /// Round in which the trade executed
    pub round: usize,

    /// Position in the ledger (0-based append order)
    pub sequence: u64,
}

impl Trade {
    /// Total cash leg of the trade
    ///
    /// Cannot overflow: the market bounds `quantity * unit_price` when the
    /// underlying offer is created.
    pub fn total_cost(&self) -> i64 {
        self.unit_price * self.quantity as i64
    }
}
