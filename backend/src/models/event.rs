//! Event logging for simulation replay and auditing.
//!
//! This module defines the Event enum which captures all significant state
//! changes during a simulation run. Events enable:
//! - Debugging (understand what happened and when)
//! - Auditing (verify correctness of trades and sinks)
//! - Analysis (extract metrics and patterns after the run)
//!
//! # Event Types
//!
//! Events are categorized by round phase:
//! - **Broadcast**: the round's market-news tag (opaque to the core)
//! - **Offer**: board changes (created, cancelled, expired)
//! - **Trade**: an offer was accepted and settled
//! - **IntentRejected**: a decision-layer intent failed validation
//! - **Survival**: consumption, operational cost, death
//! - **RoundSettled**: end-of-round settlement summary
//!
//! An intent rejection is an expected outcome, not a fault: it is logged
//! here and surfaced to the caller, and the round continues.

use crate::models::asset::AssetKind;
use crate::models::offer::Side;

/// Simulation event capturing a state change.
///
/// All events include a round number for temporal ordering.
/// Events are logged in the order they occur within a round.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Round's broadcast event was fanned out to all agents
    Broadcast {
        round: usize,
        event_id: String,
        category: String,
    },

    /// An offer was placed on the public board
    OfferCreated {
        round: usize,
        offer_id: u64,
        agent_id: String,
        side: Side,
        kind: AssetKind,
        quantity: u32,
        unit_price: i64,
    },

    /// An open offer was cancelled (explicitly, on owner death, or to
    /// release an over-committed reservation after a sink)
    OfferCancelled {
        round: usize,
        offer_id: u64,
        agent_id: String,
        reason: String,
    },

    /// An open offer outlived its time-to-live
    OfferExpired {
        round: usize,
        offer_id: u64,
        agent_id: String,
    },

    /// An offer was accepted and atomically settled
    TradeExecuted {
        round: usize,
        trade_id: u64,
        buyer_id: String,
        seller_id: String,
        kind: AssetKind,
        quantity: u32,
        unit_price: i64,
    },

    /// A decision-layer intent failed validation and was skipped
    IntentRejected {
        round: usize,
        agent_id: String,
        reason: String,
    },

    /// Agent consumed one unit of the survival asset
    Consumption {
        round: usize,
        agent_id: String,
        kind: AssetKind,
        energy_after: i32,
    },

    /// Per-round operational cost was deducted
    OperationalCost {
        round: usize,
        agent_id: String,
        amount: i64,
        cash_after: i64,
    },

    /// Agent went bankrupt or ran out of energy
    AgentDied {
        round: usize,
        agent_id: String,
        cancelled_offers: usize,
    },

    /// End-of-round settlement completed
    RoundSettled {
        round: usize,
        living_agents: usize,
        snapshots: usize,
    },
}

impl Event {
    /// Get the round number when this event occurred
    pub fn round(&self) -> usize {
        match self {
            Event::Broadcast { round, .. } => *round,
            Event::OfferCreated { round, .. } => *round,
            Event::OfferCancelled { round, .. } => *round,
            Event::OfferExpired { round, .. } => *round,
            Event::TradeExecuted { round, .. } => *round,
            Event::IntentRejected { round, .. } => *round,
            Event::Consumption { round, .. } => *round,
            Event::OperationalCost { round, .. } => *round,
            Event::AgentDied { round, .. } => *round,
            Event::RoundSettled { round, .. } => *round,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Broadcast { .. } => "Broadcast",
            Event::OfferCreated { .. } => "OfferCreated",
            Event::OfferCancelled { .. } => "OfferCancelled",
            Event::OfferExpired { .. } => "OfferExpired",
            Event::TradeExecuted { .. } => "TradeExecuted",
            Event::IntentRejected { .. } => "IntentRejected",
            Event::Consumption { .. } => "Consumption",
            Event::OperationalCost { .. } => "OperationalCost",
            Event::AgentDied { .. } => "AgentDied",
            Event::RoundSettled { .. } => "RoundSettled",
        }
    }
}

/// Append-only log of simulation events
///
/// # Example
/// ```
/// use market_simulator_core_rs::models::{Event, EventLog};
///
/// let mut log = EventLog::new();
/// log.log(Event::Broadcast {
///     round: 0,
///     event_id: "drought".to_string(),
///     category: "weather".to_string(),
/// });
/// assert_eq!(log.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty event log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events, in log order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events from one round, in log order
    pub fn events_for_round(&self, round: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.round() == round).collect()
    }

    /// Count events of one type (by `event_type` name)
    pub fn count_type(&self, event_type: &str) -> usize {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .count()
    }
}
