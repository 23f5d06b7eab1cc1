//! Scripted policy: fixed per-turn intent queue
//!
//! Used by integration tests to drive exact market scenarios through the
//! orchestrator without any heuristics in the loop. Each call to `decide`
//! pops the next scripted turn; once the script runs out the policy goes
//! quiet.

use std::collections::VecDeque;

use crate::decision::{DecisionPolicy, Intent, TurnContext};

/// Policy that replays a predefined list of turns
///
/// # Example
/// ```
/// use market_simulator_core_rs::decision::{Intent, ScriptedPolicy};
/// use market_simulator_core_rs::{AssetKind, Side};
///
/// let mut policy = ScriptedPolicy::new(vec![
///     vec![Intent::CreateOffer {
///         side: Side::Sell,
///         kind: AssetKind::Gold,
///         quantity: 5,
///         unit_price: 1000,
///     }],
///     vec![], // second turn: do nothing
/// ]);
/// assert_eq!(policy.remaining_turns(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    turns: VecDeque<Vec<Intent>>,
}

impl ScriptedPolicy {
    /// Create a policy from one intent list per turn
    pub fn new(turns: Vec<Vec<Intent>>) -> Self {
        Self {
            turns: turns.into(),
        }
    }

    /// Turns left in the script
    pub fn remaining_turns(&self) -> usize {
        self.turns.len()
    }
}

impl DecisionPolicy for ScriptedPolicy {
    fn decide(&mut self, _ctx: &TurnContext) -> Vec<Intent> {
        self.turns.pop_front().unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::asset::Holdings;
    use crate::decision::AgentView;

    fn ctx() -> TurnContext {
        TurnContext {
            round: 0,
            agent: AgentView {
                id: "a".to_string(),
                cash: 0,
                available_cash: 0,
                holdings: Holdings::new(),
                available: Holdings::new(),
                energy: 10,
            },
            open_offers: Vec::new(),
            recent_trades: Vec::new(),
            broadcast: None,
        }
    }

    #[test]
    fn test_replays_then_goes_quiet() {
        let mut policy = ScriptedPolicy::new(vec![vec![Intent::NoAction], vec![]]);
        assert_eq!(policy.decide(&ctx()), vec![Intent::NoAction]);
        assert_eq!(policy.decide(&ctx()), Vec::<Intent>::new());
        assert_eq!(policy.decide(&ctx()), Vec::<Intent>::new());
    }
}
