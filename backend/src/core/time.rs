//! Round management for the simulation
//!
//! The simulation operates in discrete rounds. Each round runs a broadcast
//! phase, one turn per living agent, and a settlement phase. This module
//! provides deterministic round advancement.

use serde::{Deserialize, Serialize};

/// Tracks the current simulation round
///
/// # Example
/// ```
/// use market_simulator_core_rs::RoundClock;
///
/// let mut clock = RoundClock::new(20); // 20 rounds total
/// assert_eq!(clock.current_round(), 0);
/// assert!(!clock.is_finished());
///
/// clock.advance_round();
/// assert_eq!(clock.current_round(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundClock {
    /// Rounds completed since simulation start
    current_round: usize,
    /// Configured number of rounds for the run
    total_rounds: usize,
}

impl RoundClock {
    /// Create a new RoundClock
    ///
    /// # Panics
    /// Panics if `total_rounds` is zero.
    pub fn new(total_rounds: usize) -> Self {
        assert!(total_rounds > 0, "total_rounds must be positive");
        Self {
            current_round: 0,
            total_rounds,
        }
    }

    /// Advance to the next round
    pub fn advance_round(&mut self) {
        self.current_round += 1;
    }

    /// Get the current round (0-indexed)
    pub fn current_round(&self) -> usize {
        self.current_round
    }

    /// Get the configured total number of rounds
    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    /// Whether the configured round count has been reached
    pub fn is_finished(&self) -> bool {
        self.current_round >= self.total_rounds
    }
}
