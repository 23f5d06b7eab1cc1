//! Market engine
//!
//! Central authority composing the order book, the agent registry and the
//! trade ledger. Every operation is atomic: all side effects commit
//! together or none do.
//!
//! # Reservations
//!
//! Creating an offer mutates no balance; it *reserves* the committed
//! quantity (Sell) or cash (Buy) by subtracting it from the owner's
//! available balance:
//!
//! ```text
//! available_cash(a)        = cash(a)     - Σ total_cost over a's open Buy offers
//! available_asset(a, kind) = holding(a)  - Σ quantity   over a's open Sell offers of kind
//! ```
//!
//! Validating new commitments against *available* rather than total
//! balance is what prevents overselling: without it an agent could open
//! two sell offers against the same unit of inventory and double-spend it
//! when both are accepted.
//!
//! # Critical Invariants
//!
//! - **No overselling**: `available >= 0` for every agent and kind after
//!   every operation
//! - **Atomicity**: a failed acceptance leaves balances and the offer
//!   exactly as they were
//! - **Conservation**: trades move value between agents, never create or
//!   destroy it

use crate::ledger::Ledger;
use crate::market::book::OrderBook;
use crate::market::MarketError;
use crate::models::agent::Agent;
use crate::models::asset::AssetKind;
use crate::models::offer::{Offer, Side};
use crate::models::registry::AgentRegistry;
use crate::models::trade::Trade;

/// The market clearinghouse for one simulation run
///
/// Owns all economic state; the orchestrator reaches agents only through
/// it, so no other component can mutate balances or the board.
///
/// # Example
/// ```
/// use market_simulator_core_rs::{
///     Agent, AgentRegistry, AssetKind, Holdings, Market, Side,
/// };
///
/// let registry = AgentRegistry::new(vec![
///     Agent::new("alice".to_string(), 10_000, Holdings::new().with(AssetKind::Gold, 5), 10),
///     Agent::new("bob".to_string(), 10_000, Holdings::new(), 10),
/// ]);
/// let mut market = Market::new(registry);
///
/// let offer_id = market
///     .create_offer("alice", Side::Sell, AssetKind::Gold, 5, 1000, 0)
///     .unwrap();
/// let trade = market.accept_offer("bob", offer_id, 0).unwrap();
///
/// assert_eq!(trade.total_cost(), 5000);
/// assert_eq!(market.registry().get("alice").unwrap().cash(), 15_000);
/// assert_eq!(market.registry().get("bob").unwrap().cash(), 5_000);
/// ```
#[derive(Debug, Clone)]
pub struct Market {
    registry: AgentRegistry,
    book: OrderBook,
    ledger: Ledger,
}

impl Market {
    /// Create a market over a registry of agents
    pub fn new(registry: AgentRegistry) -> Self {
        Self {
            registry,
            book: OrderBook::new(),
            ledger: Ledger::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the agent registry
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Get mutable access to the agent registry
    ///
    /// Reserved for the orchestrator's survival mechanics (energy, costs,
    /// death). Trade execution goes through offer acceptance only.
    pub fn registry_mut(&mut self) -> &mut AgentRegistry {
        &mut self.registry
    }

    /// Get the order book
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Get the trade ledger
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // ========================================================================
    // Availability (total minus reservations)
    // ========================================================================

    /// Cash not committed to the agent's own open Buy offers
    pub fn available_cash(&self, agent_id: &str) -> Result<i64, MarketError> {
        let agent = self.agent(agent_id)?;
        let reserved: i64 = self
            .book
            .iter_active_for_owner(agent_id)
            .filter(|o| o.side() == Side::Buy)
            .map(|o| o.total_cost())
            .sum();
        Ok(agent.cash() - reserved)
    }

    /// Units of `kind` not committed to the agent's own open Sell offers
    ///
    /// Returned as i64 so a transient deficit (possible only at the sink
    /// boundary, before `release_overcommitted` runs) is visible.
    pub fn available_asset(&self, agent_id: &str, kind: AssetKind) -> Result<i64, MarketError> {
        let agent = self.agent(agent_id)?;
        let reserved: i64 = self
            .book
            .iter_active_for_owner(agent_id)
            .filter(|o| o.side() == Side::Sell && o.kind() == kind)
            .map(|o| o.quantity() as i64)
            .sum();
        Ok(agent.holdings().get(kind) as i64 - reserved)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Create a new offer and reserve the committed quantity or cash
    ///
    /// - Sell: requires `available_asset >= quantity`
    /// - Buy: requires `available_cash >= quantity * unit_price`
    ///
    /// No balance is mutated; the reservation is implicit in the open
    /// offer. Returns the new offer's ID.
    pub fn create_offer(
        &mut self,
        agent_id: &str,
        side: Side,
        kind: AssetKind,
        quantity: u32,
        unit_price: i64,
        round: usize,
    ) -> Result<u64, MarketError> {
        if quantity == 0 {
            return Err(MarketError::InvalidQuantity);
        }
        if unit_price <= 0 {
            return Err(MarketError::InvalidPrice);
        }
        // Bound the cash leg here, for both sides: every later use of the
        // offer's total (acceptance, reservations, ledger records) relies
        // on `quantity * unit_price` fitting in i64.
        let required = unit_price
            .checked_mul(quantity as i64)
            .ok_or(MarketError::OfferTooLarge {
                quantity,
                unit_price,
            })?;
        self.require_alive(agent_id)?;

        match side {
            Side::Sell => {
                let available = self.available_asset(agent_id, kind)?;
                if available < quantity as i64 {
                    return Err(MarketError::InsufficientInventory {
                        kind,
                        required: quantity,
                        available: available.max(0) as u32,
                    });
                }
            }
            Side::Buy => {
                let available = self.available_cash(agent_id)?;
                if available < required {
                    return Err(MarketError::InsufficientFunds {
                        required,
                        available,
                    });
                }
            }
        }

        Ok(self.book.open(agent_id, side, kind, quantity, unit_price, round))
    }

    /// Accept an open offer in full, executing the transfer atomically
    ///
    /// The acceptor takes the counterpart side: paying cash for a Sell
    /// offer, delivering inventory for a Buy offer. On any validation
    /// failure the offer stays Open and no balance moves. On success the
    /// offer fills and the trade is appended to the ledger.
    pub fn accept_offer(
        &mut self,
        agent_id: &str,
        offer_id: u64,
        round: usize,
    ) -> Result<Trade, MarketError> {
        self.require_alive(agent_id)?;

        let offer = self
            .book
            .get(offer_id)
            .ok_or(MarketError::OfferNotFound(offer_id))?;
        if !offer.is_open() {
            // Normal reject path: the offer may have filled, cancelled or
            // expired since the acceptor last saw the board.
            return Err(MarketError::OfferNotOpen {
                offer_id,
                status: offer.status(),
            });
        }
        if offer.owner_id() == agent_id {
            return Err(MarketError::SelfTrade {
                offer_id,
                agent_id: agent_id.to_string(),
            });
        }

        let (kind, quantity, unit_price, side) =
            (offer.kind(), offer.quantity(), offer.unit_price(), offer.side());
        // Cannot overflow: `create_offer` bounds the product.
        let total = unit_price * quantity as i64;
        let owner_id = offer.owner_id().to_string();

        // The owner's leg was reserved at creation; validate the
        // acceptor's counterpart leg against its available balance.
        let (buyer_id, seller_id) = match side {
            Side::Sell => {
                let available = self.available_cash(agent_id)?;
                if available < total {
                    return Err(MarketError::InsufficientFunds {
                        required: total,
                        available,
                    });
                }
                (agent_id.to_string(), owner_id)
            }
            Side::Buy => {
                let available = self.available_asset(agent_id, kind)?;
                if available < quantity as i64 {
                    return Err(MarketError::InsufficientInventory {
                        kind,
                        required: quantity,
                        available: available.max(0) as u32,
                    });
                }
                (owner_id, agent_id.to_string())
            }
        };

        // Execute: both legs were validated, so neither transfer can fail
        // and the pair commits as a unit. Filling the offer releases the
        // owner's reservation, replaced by the actual balance change.
        self.registry.transfer_cash(&buyer_id, &seller_id, total)?;
        self.registry
            .transfer_asset(&seller_id, &buyer_id, kind, quantity)?;
        self.book.mark_filled(offer_id);

        Ok(self
            .ledger
            .record(&buyer_id, &seller_id, kind, quantity, unit_price, round))
    }

    /// Cancel an open offer, releasing its reservation
    ///
    /// No balance changes: nothing was moved at creation. Fails with
    /// `NotOwner` for someone else's offer and `OfferNotOpen` for an
    /// already-closed one; a closed offer never re-triggers a transfer.
    pub fn cancel_offer(&mut self, agent_id: &str, offer_id: u64) -> Result<(), MarketError> {
        self.agent(agent_id)?;
        self.book.cancel(offer_id, agent_id)
    }

    /// Cancel all of a dead agent's open offers
    ///
    /// Invoked by the orchestrator on death. Remaining holdings are not
    /// redistributed: they freeze with the corpse (no afterlife trading).
    /// Returns the cancelled offer IDs.
    pub fn force_liquidate(&mut self, agent_id: &str) -> Result<Vec<u64>, MarketError> {
        self.agent(agent_id)?;
        Ok(self.book.cancel_all_for_owner(agent_id))
    }

    /// Expire open offers created at or before `cutoff_round`
    ///
    /// Returns `(offer_id, owner_id)` pairs for event logging.
    pub fn expire_offers(&mut self, cutoff_round: usize) -> Vec<(u64, String)> {
        let ids = self.book.expire_older_than(cutoff_round);
        ids.into_iter()
            .map(|id| {
                let owner = self
                    .book
                    .get(id)
                    .expect("expired offer exists")
                    .owner_id()
                    .to_string();
                (id, owner)
            })
            .collect()
    }

    /// Cancel the agent's newest open offers until no reservation exceeds
    /// its backing balance
    ///
    /// Sinks (operational cost, consumption) reduce *total* balances
    /// without touching the board, so an agent's reservations can briefly
    /// exceed what it still holds. This sweep restores `available >= 0`
    /// by releasing the most recent over-commitments first; older offers
    /// keep their first-created priority. Returns the cancelled IDs.
    pub fn release_overcommitted(&mut self, agent_id: &str) -> Result<Vec<u64>, MarketError> {
        self.agent(agent_id)?;
        let mut cancelled = Vec::new();

        // Cash reservations
        while self.available_cash(agent_id)? < 0 {
            match self.newest_open_offer(agent_id, Side::Buy, None) {
                Some(id) => {
                    self.book.cancel(id, agent_id)?;
                    cancelled.push(id);
                }
                None => break, // cash itself is negative; bankruptcy handles it
            }
        }

        // Inventory reservations, per kind
        for kind in AssetKind::ALL {
            while self.available_asset(agent_id, kind)? < 0 {
                match self.newest_open_offer(agent_id, Side::Sell, Some(kind)) {
                    Some(id) => {
                        self.book.cancel(id, agent_id)?;
                        cancelled.push(id);
                    }
                    None => break,
                }
            }
        }

        Ok(cancelled)
    }

    // ========================================================================
    // Consistency audit
    // ========================================================================

    /// Verify every reservation is backed by its owner's balance
    ///
    /// Checks `available >= 0` for every agent and kind, and that no open
    /// offer belongs to a dead agent. A violation here means market state
    /// is corrupt; the orchestrator treats it as fatal.
    pub fn check_reservations(&self) -> Result<(), String> {
        for agent in self.registry.iter() {
            let id = agent.id();
            let cash = self
                .available_cash(id)
                .map_err(|e| format!("audit: {}", e))?;
            if cash < 0 {
                return Err(format!("agent {} has negative available cash: {}", id, cash));
            }
            for kind in AssetKind::ALL {
                let avail = self
                    .available_asset(id, kind)
                    .map_err(|e| format!("audit: {}", e))?;
                if avail < 0 {
                    return Err(format!(
                        "agent {} has negative available {}: {}",
                        id,
                        kind.as_str(),
                        avail
                    ));
                }
            }
        }
        for offer in self.book.iter_active() {
            let owner = self
                .registry
                .get(offer.owner_id())
                .ok_or_else(|| format!("open offer {} has unknown owner", offer.id()))?;
            if !owner.is_alive() {
                return Err(format!(
                    "open offer {} owned by dead agent {}",
                    offer.id(),
                    offer.owner_id()
                ));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn agent(&self, agent_id: &str) -> Result<&Agent, MarketError> {
        self.registry
            .get(agent_id)
            .ok_or_else(|| MarketError::UnknownAgent(agent_id.to_string()))
    }

    fn require_alive(&self, agent_id: &str) -> Result<(), MarketError> {
        if !self.agent(agent_id)?.is_alive() {
            return Err(MarketError::AgentNotAlive(agent_id.to_string()));
        }
        Ok(())
    }

    fn newest_open_offer(
        &self,
        agent_id: &str,
        side: Side,
        kind: Option<AssetKind>,
    ) -> Option<u64> {
        self.book
            .iter_active_for_owner(agent_id)
            .filter(|o| o.side() == side && kind.map_or(true, |k| o.kind() == k))
            .map(Offer::id)
            .last()
    }
}
