//! Market clearinghouse
//!
//! The single authority over economic state: it owns the agent registry,
//! the order book and the trade ledger, validates every intent against
//! actual unencumbered holdings, and executes accepted offers atomically.
//!
//! # Error taxonomy
//!
//! Every variant of [`MarketError`] except `UnknownAgent` and `Agent` is a
//! *validation rejection*: expected, recoverable, returned to the caller,
//! and never a source of partial state change. The other two are
//! structural and escalate to a fatal simulation error: `UnknownAgent` is
//! an orchestrator referencing an agent the registry has never seen, and
//! `Agent` is a transfer leg failing *after* both legs were validated —
//! which can only mean the reservation accounting is broken.

pub mod book;
pub mod engine;

use thiserror::Error;

use crate::models::agent::AgentError;
use crate::models::asset::AssetKind;
use crate::models::offer::OfferStatus;

pub use book::OrderBook;
pub use engine::Market;

/// Errors returned by market operations
#[derive(Debug, Error, PartialEq)]
pub enum MarketError {
    #[error("Quantity must be positive")]
    InvalidQuantity,

    #[error("Unit price must be positive")]
    InvalidPrice,

    #[error("Offer total {quantity} x {unit_price} overflows the money range")]
    OfferTooLarge { quantity: u32, unit_price: i64 },

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Insufficient {kind:?} inventory: required {required}, available {available}")]
    InsufficientInventory {
        kind: AssetKind,
        required: u32,
        available: u32,
    },

    #[error("Offer {0} not found")]
    OfferNotFound(u64),

    #[error("Offer {offer_id} is not open (status: {status:?})")]
    OfferNotOpen { offer_id: u64, status: OfferStatus },

    #[error("Agent {requester} does not own offer {offer_id}")]
    NotOwner { offer_id: u64, requester: String },

    #[error("Agent {agent_id} cannot accept its own offer {offer_id}")]
    SelfTrade { offer_id: u64, agent_id: String },

    #[error("Agent {0} is not alive")]
    AgentNotAlive(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// A transfer leg failed after both legs were validated. Balances no
    /// longer back the reservations, so this is structural, not a reject.
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),
}

impl MarketError {
    /// Whether this error is an expected validation rejection
    ///
    /// Rejections are logged and skipped by the orchestrator; anything
    /// else aborts the run.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            MarketError::UnknownAgent(_) | MarketError::Agent(_)
        )
    }
}
