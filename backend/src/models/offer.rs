//! Offer model
//!
//! A standing, reservable intent to buy or sell a fixed quantity of one
//! asset kind at a fixed unit price. Offers are full-fill only: acceptance
//! always moves the entire quantity, which keeps the reservation check a
//! single inequality instead of a running remainder.
//!
//! Lifecycle: Open → Filled | Cancelled | Expired. Status transitions are
//! validated by the order book; an offer never reopens.
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};

use crate::models::asset::AssetKind;

/// Which side of the market an offer sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Owner wants to buy `quantity` at `unit_price` (cash reserved)
    Buy,
    /// Owner wants to sell `quantity` at `unit_price` (inventory reserved)
    Sell,
}

/// Offer status
///
/// Tracks the lifecycle of an offer on the public board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferStatus {
    /// Standing on the board; quantity/cash reserved against the owner
    Open,

    /// Accepted in full; a ledger trade exists for it
    Filled,

    /// Withdrawn by the owner, or force-cancelled on owner death
    Cancelled,

    /// Outlived its time-to-live without being accepted
    Expired,
}

/// A standing offer on the public board
///
/// # Example
/// ```
/// use market_simulator_core_rs::{AssetKind, Offer, OfferStatus, Side};
///
/// let offer = Offer::new(1, "alice".to_string(), Side::Sell, AssetKind::Gold, 5, 1000, 0);
/// assert_eq!(offer.total_cost(), 5000);
/// assert_eq!(offer.status(), OfferStatus::Open);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    /// Unique, monotonically assigned identifier (never reused)
    id: u64,

    /// Owning agent ID
    owner_id: String,

    /// Buy or Sell
    side: Side,

    /// Asset kind being traded
    kind: AssetKind,

    /// Quantity (always positive; full-fill only)
    quantity: u32,

    /// Unit price (i64 cents, always positive)
    unit_price: i64,

    /// Current status
    status: OfferStatus,

    /// Round in which the offer was created
    round_created: usize,
}

impl Offer {
    /// Create a new Open offer
    ///
    /// # Panics
    /// Panics if quantity or unit price is non-positive, or if
    /// `quantity * unit_price` overflows `i64`; the market validates all
    /// three before construction.
    pub fn new(
        id: u64,
        owner_id: String,
        side: Side,
        kind: AssetKind,
        quantity: u32,
        unit_price: i64,
        round_created: usize,
    ) -> Self {
        assert!(quantity > 0, "quantity must be positive");
        assert!(unit_price > 0, "unit_price must be positive");
        assert!(
            unit_price.checked_mul(quantity as i64).is_some(),
            "cash leg must fit in i64"
        );
        Self {
            id,
            owner_id,
            side,
            kind,
            quantity,
            unit_price,
            status: OfferStatus::Open,
            round_created,
        }
    }

    /// Get offer ID
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get owner agent ID
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Get offer side
    pub fn side(&self) -> Side {
        self.side
    }

    /// Get asset kind
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Get quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Get unit price (cents)
    pub fn unit_price(&self) -> i64 {
        self.unit_price
    }

    /// Get current status
    pub fn status(&self) -> OfferStatus {
        self.status
    }

    /// Round the offer was created in
    pub fn round_created(&self) -> usize {
        self.round_created
    }

    /// Whether the offer is still standing
    pub fn is_open(&self) -> bool {
        self.status == OfferStatus::Open
    }

    /// Total cash leg of the offer: `unit_price * quantity`
    ///
    /// Cannot overflow: the product is bounded at construction.
    pub fn total_cost(&self) -> i64 {
        self.unit_price * self.quantity as i64
    }

    /// Mark as filled. Caller must have checked `is_open`.
    pub(crate) fn mark_filled(&mut self) {
        debug_assert!(self.is_open(), "only open offers can fill");
        self.status = OfferStatus::Filled;
    }

    /// Mark as cancelled. Caller must have checked `is_open`.
    pub(crate) fn mark_cancelled(&mut self) {
        debug_assert!(self.is_open(), "only open offers can cancel");
        self.status = OfferStatus::Cancelled;
    }

    /// Mark as expired. Caller must have checked `is_open`.
    pub(crate) fn mark_expired(&mut self) {
        debug_assert!(self.is_open(), "only open offers can expire");
        self.status = OfferStatus::Expired;
    }
}
