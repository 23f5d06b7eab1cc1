//! Broadcast events
//!
//! Each round opens with one market-news event fanned out to every agent.
//! The event is opaque to the core: it is logged and handed to the
//! decision layer, never used in any computation. The source is a trait
//! so tests can pin the sequence and external drivers can plug in their
//! own narrative generator.

use serde::{Deserialize, Serialize};

use crate::rng::RngManager;

/// One broadcastable market-news event
///
/// Only `id` and `category` are logged; the text fields exist for the
/// decision layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastEvent {
    /// Stable identifier, used in the event log
    pub id: String,

    /// Headline shown to agents
    pub title: String,

    /// Body text shown to agents
    pub content: String,

    /// Free-form grouping tag (e.g. "weather", "rumor")
    pub category: String,
}

/// Source of per-round broadcast events
///
/// Draws use the run's seeded RNG so a pinned seed reproduces the exact
/// news sequence. Returning `None` means no broadcast this round.
pub trait BroadcastSource {
    fn draw(&mut self, rng: &mut RngManager) -> Option<BroadcastEvent>;
}

/// Broadcast source over a fixed pool of events, drawn uniformly
///
/// # Example
/// ```
/// use market_simulator_core_rs::broadcast::{BroadcastEvent, BroadcastSource, StaticBroadcastSource};
/// use market_simulator_core_rs::RngManager;
///
/// let mut source = StaticBroadcastSource::new(vec![BroadcastEvent {
///     id: "drought".to_string(),
///     title: "Drought hits the orchards".to_string(),
///     content: "Apple supply expected to fall.".to_string(),
///     category: "weather".to_string(),
/// }]);
///
/// let mut rng = RngManager::new(1);
/// assert!(source.draw(&mut rng).is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticBroadcastSource {
    events: Vec<BroadcastEvent>,
}

impl StaticBroadcastSource {
    /// Create a source over a fixed pool (may be empty)
    pub fn new(events: Vec<BroadcastEvent>) -> Self {
        Self { events }
    }

    /// Create an empty source: every round is quiet
    pub fn silent() -> Self {
        Self::default()
    }

    /// Parse a pool from a JSON array of events
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let events: Vec<BroadcastEvent> = serde_json::from_str(json)?;
        Ok(Self::new(events))
    }

    /// Number of events in the pool
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl BroadcastSource for StaticBroadcastSource {
    fn draw(&mut self, rng: &mut RngManager) -> Option<BroadcastEvent> {
        if self.events.is_empty() {
            return None;
        }
        let index = rng.range(0, self.events.len() as i64) as usize;
        Some(self.events[index].clone())
    }
}
