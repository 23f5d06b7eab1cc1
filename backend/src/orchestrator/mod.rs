//! Round orchestration
//!
//! The simulation loop: broadcast phase, randomized turn phase, and
//! settlement phase, driven round by round until the configured count is
//! reached or every agent is dead.

pub mod engine;

pub use engine::{
    AgentConfig, PolicyConfig, RoundOrchestrator, RoundResult, RunSummary, SimulationConfig,
    SimulationError, SurvivalParams,
};
