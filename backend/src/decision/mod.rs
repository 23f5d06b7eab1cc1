//! Decision layer boundary
//!
//! The core never reasons about *why* an agent trades. Whatever process
//! decides — an LLM, a heuristic, a test script — is modeled as a
//! [`DecisionPolicy`]: a function from a read-only [`TurnContext`] to a
//! list of [`Intent`] values. The orchestrator dispatches each intent to
//! the market in order, logging rejections without ending the turn.
//!
//! A driver that times out simply returns no intents; the orchestrator
//! treats that the same as an explicit `NoAction`.
//!
//! Built-in policies:
//! - [`PassivePolicy`]: never acts (baseline)
//! - [`SurvivalPolicy`]: deterministic subsistence heuristic
//! - [`ScriptedPolicy`]: fixed per-turn intent queue
//!
//! NOTE: `ScriptedPolicy` is available in all builds to support
//! integration testing, but should only be used in test code.

pub mod passive;
pub mod scripted;
pub mod survival;

use serde::{Deserialize, Serialize};

use crate::broadcast::BroadcastEvent;
use crate::models::asset::{AssetKind, Holdings};
use crate::models::offer::{Offer, Side};
use crate::models::trade::Trade;

pub use passive::PassivePolicy;
pub use scripted::ScriptedPolicy;
pub use survival::SurvivalPolicy;

/// A single structured order intent from the decision layer
///
/// The core consumes these without any assumption about how they were
/// produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Intent {
    /// Place a new offer on the board
    CreateOffer {
        side: Side,
        kind: AssetKind,
        quantity: u32,
        unit_price: i64,
    },

    /// Accept a specific standing offer in full
    AcceptOffer { offer_id: u64 },

    /// Withdraw one of the agent's own open offers
    CancelOffer { offer_id: u64 },

    /// Explicitly do nothing this turn
    NoAction,
}

/// The requesting agent's own balances as exposed to its policy
#[derive(Debug, Clone, PartialEq)]
pub struct AgentView {
    /// Agent ID
    pub id: String,

    /// Total cash (cents)
    pub cash: i64,

    /// Cash not reserved by the agent's own open Buy offers
    pub available_cash: i64,

    /// Total holdings per kind
    pub holdings: Holdings,

    /// Holdings not reserved by the agent's own open Sell offers
    pub available: Holdings,

    /// Current energy
    pub energy: i32,
}

/// Read-only view handed to a policy at the start of its turn
#[derive(Debug, Clone)]
pub struct TurnContext {
    /// Current round
    pub round: usize,

    /// The deciding agent's own state
    pub agent: AgentView,

    /// All currently open offers, in creation order
    pub open_offers: Vec<Offer>,

    /// The most recent ledger entries, oldest first
    pub recent_trades: Vec<Trade>,

    /// This round's broadcast event, if any
    pub broadcast: Option<BroadcastEvent>,
}

/// Capability boundary for the decision layer
///
/// Implementations must be deterministic if the run is to be
/// reproducible; anything nondeterministic (an LLM, wall-clock timeouts)
/// lives outside the core behind this trait.
pub trait DecisionPolicy {
    /// Decide this turn's intents. Empty means the turn is skipped.
    fn decide(&mut self, ctx: &TurnContext) -> Vec<Intent>;

    /// Short policy name for diagnostics
    fn name(&self) -> &'static str;
}
