//! Asset kinds and per-agent holdings
//!
//! The tradeable goods form a small fixed set. The set size is a constant
//! (`AssetKind::COUNT`), never an assumption baked into arithmetic, so the
//! enum can grow without touching balance logic.
//!
//! CRITICAL: All money values are i64 (cents); all asset quantities are
//! non-negative integers.

use serde::{Deserialize, Serialize};

/// Kind of tradeable asset
///
/// # Example
/// ```
/// use market_simulator_core_rs::AssetKind;
///
/// assert_eq!(AssetKind::COUNT, 3);
/// assert_eq!(AssetKind::Gold.as_str(), "gold");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Consumable survival good
    Apple,
    /// Industrial good
    Chip,
    /// Store of value
    Gold,
}

impl AssetKind {
    /// Number of asset kinds in the system
    pub const COUNT: usize = 3;

    /// All asset kinds, in canonical order
    pub const ALL: [AssetKind; AssetKind::COUNT] =
        [AssetKind::Apple, AssetKind::Chip, AssetKind::Gold];

    /// Canonical index of this kind, in `0..COUNT`
    pub fn index(self) -> usize {
        match self {
            AssetKind::Apple => 0,
            AssetKind::Chip => 1,
            AssetKind::Gold => 2,
        }
    }

    /// Lowercase name, matching the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Apple => "apple",
            AssetKind::Chip => "chip",
            AssetKind::Gold => "gold",
        }
    }
}

/// Per-kind asset quantities for one agent
///
/// Quantities are `u32` and therefore non-negative by construction.
/// Removal is checked; callers that need an error should wrap the `false`
/// return into their own error type (see `Agent::remove_asset`).
///
/// # Example
/// ```
/// use market_simulator_core_rs::{AssetKind, Holdings};
///
/// let mut holdings = Holdings::new().with(AssetKind::Gold, 5);
/// assert_eq!(holdings.get(AssetKind::Gold), 5);
///
/// assert!(holdings.checked_remove(AssetKind::Gold, 5));
/// assert!(!holdings.checked_remove(AssetKind::Gold, 1));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holdings {
    /// Quantity per kind, indexed by `AssetKind::index`
    units: [u32; AssetKind::COUNT],
}

impl Holdings {
    /// Create empty holdings (zero of every kind)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for initial inventories
    pub fn with(mut self, kind: AssetKind, quantity: u32) -> Self {
        self.units[kind.index()] = quantity;
        self
    }

    /// Quantity held of one kind
    pub fn get(&self, kind: AssetKind) -> u32 {
        self.units[kind.index()]
    }

    /// Add units of one kind
    pub fn add(&mut self, kind: AssetKind, quantity: u32) {
        self.units[kind.index()] += quantity;
    }

    /// Remove units of one kind; returns false (and changes nothing) if the
    /// agent holds fewer than `quantity`
    pub fn checked_remove(&mut self, kind: AssetKind, quantity: u32) -> bool {
        let held = self.units[kind.index()];
        if held < quantity {
            return false;
        }
        self.units[kind.index()] = held - quantity;
        true
    }

    /// Total units across all kinds
    pub fn total_units(&self) -> u64 {
        self.units.iter().map(|&q| q as u64).sum()
    }
}
