//! Domain models: assets, agents, offers, trades, events, registry

pub mod agent;
pub mod asset;
pub mod event;
pub mod offer;
pub mod registry;
pub mod trade;

pub use agent::{Agent, AgentError};
pub use asset::{AssetKind, Holdings};
pub use event::{Event, EventLog};
pub use offer::{Offer, OfferStatus, Side};
pub use registry::AgentRegistry;
pub use trade::Trade;
