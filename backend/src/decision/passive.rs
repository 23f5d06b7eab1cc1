//! Passive policy: never trades
//!
//! Baseline for experiments — with every agent passive, a run exercises
//! only the survival mechanics (decay, consumption, costs, death).

use crate::decision::{DecisionPolicy, Intent, TurnContext};

/// Policy that always declines to act
#[derive(Debug, Clone, Copy, Default)]
pub struct PassivePolicy;

impl DecisionPolicy for PassivePolicy {
    fn decide(&mut self, _ctx: &TurnContext) -> Vec<Intent> {
        vec![Intent::NoAction]
    }

    fn name(&self) -> &'static str {
        "passive"
    }
}
