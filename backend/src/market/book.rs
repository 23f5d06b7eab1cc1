//! Order book
//!
//! In-memory index of all offers ever created in a run, keyed by ID, with
//! insertion-order listing of the currently open ones. The book assigns
//! IDs monotonically and never reuses one, so closed offers stay
//! addressable (an acceptance racing a cancel gets `OfferNotOpen`, not
//! `OfferNotFound`).
//!
//! The book only manages offer lifecycle; reservation accounting against
//! agent balances lives in the market engine.

use std::collections::HashMap;

use crate::market::MarketError;
use crate::models::asset::AssetKind;
use crate::models::offer::{Offer, Side};

/// Index of all offers in one simulation run
///
/// # Example
/// ```
/// use market_simulator_core_rs::{AssetKind, OrderBook, Side};
///
/// let mut book = OrderBook::new();
/// let id = book.open("alice", Side::Sell, AssetKind::Gold, 5, 1000, 0);
/// assert_eq!(book.iter_active().count(), 1);
///
/// book.cancel(id, "alice").unwrap();
/// assert_eq!(book.iter_active().count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    /// All offers by ID, open or closed
    offers: HashMap<u64, Offer>,

    /// Offer IDs in creation order (listing order and tie-break order)
    order: Vec<u64>,

    /// Next offer ID; starts at 1, never reused
    next_id: u64,
}

impl OrderBook {
    /// Create an empty order book
    pub fn new() -> Self {
        Self {
            offers: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a new Open offer and return its ID
    pub fn open(
        &mut self,
        owner_id: &str,
        side: Side,
        kind: AssetKind,
        quantity: u32,
        unit_price: i64,
        round: usize,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.offers.insert(
            id,
            Offer::new(
                id,
                owner_id.to_string(),
                side,
                kind,
                quantity,
                unit_price,
                round,
            ),
        );
        self.order.push(id);
        id
    }

    /// Get an offer by ID (any status)
    pub fn get(&self, id: u64) -> Option<&Offer> {
        self.offers.get(&id)
    }

    /// Cancel an open offer on behalf of `requester`
    ///
    /// Fails with `NotOwner` if the requester does not own the offer, and
    /// `OfferNotOpen` if it has already filled, cancelled or expired.
    /// Cancelling a closed offer never re-triggers anything.
    pub fn cancel(&mut self, id: u64, requester: &str) -> Result<(), MarketError> {
        let offer = self.offers.get_mut(&id).ok_or(MarketError::OfferNotFound(id))?;
        if offer.owner_id() != requester {
            return Err(MarketError::NotOwner {
                offer_id: id,
                requester: requester.to_string(),
            });
        }
        if !offer.is_open() {
            return Err(MarketError::OfferNotOpen {
                offer_id: id,
                status: offer.status(),
            });
        }
        offer.mark_cancelled();
        Ok(())
    }

    /// Mark an open offer as filled. Caller must have checked `is_open`.
    pub(crate) fn mark_filled(&mut self, id: u64) {
        if let Some(offer) = self.offers.get_mut(&id) {
            offer.mark_filled();
        }
    }

    /// Force-cancel all of one owner's open offers (owner death)
    ///
    /// Returns the cancelled offer IDs in creation order.
    pub fn cancel_all_for_owner(&mut self, owner_id: &str) -> Vec<u64> {
        let mut cancelled = Vec::new();
        for &id in &self.order {
            let offer = self.offers.get_mut(&id).expect("order list tracks offers");
            if offer.is_open() && offer.owner_id() == owner_id {
                offer.mark_cancelled();
                cancelled.push(id);
            }
        }
        cancelled
    }

    /// Expire open offers created at or before `cutoff_round`
    ///
    /// Returns the expired offer IDs in creation order.
    pub fn expire_older_than(&mut self, cutoff_round: usize) -> Vec<u64> {
        let mut expired = Vec::new();
        for &id in &self.order {
            let offer = self.offers.get_mut(&id).expect("order list tracks offers");
            if offer.is_open() && offer.round_created() <= cutoff_round {
                offer.mark_expired();
                expired.push(id);
            }
        }
        expired
    }

    /// Lazy listing of currently open offers, in creation order
    ///
    /// Restartable read-only view; first-created offers list first.
    pub fn iter_active(&self) -> impl Iterator<Item = &Offer> {
        self.order
            .iter()
            .map(move |id| &self.offers[id])
            .filter(|o| o.is_open())
    }

    /// Open offers of one kind and side, in creation order
    pub fn iter_active_filtered(
        &self,
        kind: AssetKind,
        side: Side,
    ) -> impl Iterator<Item = &Offer> {
        self.iter_active()
            .filter(move |o| o.kind() == kind && o.side() == side)
    }

    /// Open offers owned by one agent
    pub fn iter_active_for_owner<'a>(&'a self, owner_id: &'a str) -> impl Iterator<Item = &'a Offer> {
        self.iter_active().filter(move |o| o.owner_id() == owner_id)
    }

    /// Total offers ever created
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no offer has ever been created
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
