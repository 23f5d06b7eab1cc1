//! Market Simulator Core - Rust Engine
//!
//! Deterministic barter-market clearinghouse and round orchestrator for
//! multi-agent survival-economy simulations.
//!
//! # Architecture
//!
//! - **core**: Round clock
//! - **models**: Domain types (Agent, Offer, Trade, Event, registry)
//! - **market**: Clearinghouse (order book, reservations, atomic settlement)
//! - **ledger**: Append-only trade record and inventory snapshots
//! - **broadcast**: Per-round market-news fan-out
//! - **decision**: Policy boundary between agents and the market
//! - **orchestrator**: Main simulation loop
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (cents)
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Trades conserve value; only the orchestrator's sinks remove it
//! 4. `available >= 0` for every agent after every settled operation

// Module declarations
pub mod broadcast;
pub mod core;
pub mod decision;
pub mod ledger;
pub mod market;
pub mod models;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use broadcast::{BroadcastEvent, BroadcastSource, StaticBroadcastSource};
pub use core::time::RoundClock;
pub use decision::{AgentView, DecisionPolicy, Intent, TurnContext};
pub use ledger::{InventorySnapshot, InventorySnapshotStore, Ledger};
pub use market::{Market, MarketError, OrderBook};
pub use models::{
    agent::{Agent, AgentError},
    asset::{AssetKind, Holdings},
    event::{Event, EventLog},
    offer::{Offer, OfferStatus, Side},
    registry::AgentRegistry,
    trade::Trade,
};
pub use orchestrator::{
    AgentConfig, PolicyConfig, RoundOrchestrator, RoundResult, RunSummary, SimulationConfig,
    SimulationError, SurvivalParams,
};
pub use rng::RngManager;
