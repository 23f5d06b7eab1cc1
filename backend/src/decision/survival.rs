//! Survival policy: deterministic subsistence heuristic
//!
//! A simple but non-trivial baseline that keeps a market moving without
//! any external reasoning engine:
//!
//! - When energy is low and the pantry is empty, buy the survival asset:
//!   accept the cheapest affordable standing Sell offer, or post a Buy
//!   offer at the configured bid if nothing is on the board.
//! - Otherwise, monetize surplus: keep one Sell offer standing for the
//!   most-held non-survival asset at the configured ask.
//!
//! All choices are deterministic (price, then offer id, as tie-breaks),
//! so runs stay reproducible.

use crate::decision::{DecisionPolicy, Intent, TurnContext};
use crate::models::asset::AssetKind;
use crate::models::offer::Side;

/// Deterministic subsistence-trading policy
#[derive(Debug, Clone)]
pub struct SurvivalPolicy {
    /// The asset consumed for energy
    survival_asset: AssetKind,

    /// Start looking for food at or below this energy level
    energy_alert: i32,

    /// Unit price posted when no Sell offer is acceptable
    bid_price: i64,

    /// Unit price asked when selling surplus
    ask_price: i64,
}

impl SurvivalPolicy {
    /// Create a policy
    ///
    /// # Panics
    /// Panics if either price is non-positive.
    pub fn new(survival_asset: AssetKind, energy_alert: i32, bid_price: i64, ask_price: i64) -> Self {
        assert!(bid_price > 0, "bid_price must be positive");
        assert!(ask_price > 0, "ask_price must be positive");
        Self {
            survival_asset,
            energy_alert,
            bid_price,
            ask_price,
        }
    }

    /// Cheapest affordable Sell offer of the survival asset from another
    /// agent, tie-broken by offer id (first created wins)
    fn best_food_offer(&self, ctx: &TurnContext) -> Option<u64> {
        ctx.open_offers
            .iter()
            .filter(|o| {
                o.side() == Side::Sell
                    && o.kind() == self.survival_asset
                    && o.owner_id() != ctx.agent.id
                    && o.total_cost() <= ctx.agent.available_cash
            })
            .min_by_key(|o| (o.unit_price(), o.id()))
            .map(|o| o.id())
    }

    fn has_own_open(&self, ctx: &TurnContext, side: Side, kind: AssetKind) -> bool {
        ctx.open_offers
            .iter()
            .any(|o| o.owner_id() == ctx.agent.id && o.side() == side && o.kind() == kind)
    }

    /// Most-held non-survival asset with at least one available unit
    fn surplus_kind(&self, ctx: &TurnContext) -> Option<AssetKind> {
        AssetKind::ALL
            .into_iter()
            .filter(|&k| k != self.survival_asset)
            .filter(|&k| ctx.agent.available.get(k) > 0)
            .max_by_key(|&k| ctx.agent.available.get(k))
    }
}

impl DecisionPolicy for SurvivalPolicy {
    fn decide(&mut self, ctx: &TurnContext) -> Vec<Intent> {
        let mut intents = Vec::new();

        let hungry = ctx.agent.energy <= self.energy_alert
            && ctx.agent.holdings.get(self.survival_asset) == 0;
        if hungry {
            if let Some(offer_id) = self.best_food_offer(ctx) {
                intents.push(Intent::AcceptOffer { offer_id });
            } else if !self.has_own_open(ctx, Side::Buy, self.survival_asset)
                && ctx.agent.available_cash >= self.bid_price
            {
                intents.push(Intent::CreateOffer {
                    side: Side::Buy,
                    kind: self.survival_asset,
                    quantity: 1,
                    unit_price: self.bid_price,
                });
            }
        }

        if let Some(kind) = self.surplus_kind(ctx) {
            if !self.has_own_open(ctx, Side::Sell, kind) {
                intents.push(Intent::CreateOffer {
                    side: Side::Sell,
                    kind,
                    quantity: 1,
                    unit_price: self.ask_price,
                });
            }
        }

        if intents.is_empty() {
            intents.push(Intent::NoAction);
        }
        intents
    }

    fn name(&self) -> &'static str {
        "survival"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::AgentView;
    use crate::models::asset::Holdings;
    use crate::models::offer::Offer;

    fn ctx(cash: i64, energy: i32, holdings: Holdings, offers: Vec<Offer>) -> TurnContext {
        TurnContext {
            round: 0,
            agent: AgentView {
                id: "me".to_string(),
                cash,
                available_cash: cash,
                holdings,
                available: holdings,
                energy,
            },
            open_offers: offers,
            recent_trades: Vec::new(),
            broadcast: None,
        }
    }

    #[test]
    fn test_hungry_accepts_cheapest_offer() {
        let offers = vec![
            Offer::new(1, "x".to_string(), Side::Sell, AssetKind::Apple, 1, 300, 0),
            Offer::new(2, "y".to_string(), Side::Sell, AssetKind::Apple, 1, 200, 0),
        ];
        let mut policy = SurvivalPolicy::new(AssetKind::Apple, 3, 250, 400);
        let intents = policy.decide(&ctx(1_000, 2, Holdings::new(), offers));
        assert_eq!(intents[0], Intent::AcceptOffer { offer_id: 2 });
    }

    #[test]
    fn test_hungry_posts_buy_when_board_empty() {
        let mut policy = SurvivalPolicy::new(AssetKind::Apple, 3, 250, 400);
        let intents = policy.decide(&ctx(1_000, 2, Holdings::new(), Vec::new()));
        assert_eq!(
            intents[0],
            Intent::CreateOffer {
                side: Side::Buy,
                kind: AssetKind::Apple,
                quantity: 1,
                unit_price: 250,
            }
        );
    }

    #[test]
    fn test_ignores_own_and_unaffordable_offers() {
        let offers = vec![
            Offer::new(1, "me".to_string(), Side::Sell, AssetKind::Apple, 1, 100, 0),
            Offer::new(2, "y".to_string(), Side::Sell, AssetKind::Apple, 1, 5_000, 0),
        ];
        let mut policy = SurvivalPolicy::new(AssetKind::Apple, 3, 250, 400);
        let intents = policy.decide(&ctx(1_000, 2, Holdings::new(), offers));
        // Cannot accept: own offer and too-expensive offer are both out.
        assert_eq!(
            intents[0],
            Intent::CreateOffer {
                side: Side::Buy,
                kind: AssetKind::Apple,
                quantity: 1,
                unit_price: 250,
            }
        );
    }

    #[test]
    fn test_sells_surplus() {
        let holdings = Holdings::new().with(AssetKind::Gold, 2).with(AssetKind::Chip, 1);
        let mut policy = SurvivalPolicy::new(AssetKind::Apple, 3, 250, 400);
        let intents = policy.decide(&ctx(1_000, 10, holdings, Vec::new()));
        assert_eq!(
            intents[0],
            Intent::CreateOffer {
                side: Side::Sell,
                kind: AssetKind::Gold,
                quantity: 1,
                unit_price: 400,
            }
        );
    }

    #[test]
    fn test_content_agent_does_nothing() {
        let mut policy = SurvivalPolicy::new(AssetKind::Apple, 3, 250, 400);
        let intents = policy.decide(&ctx(1_000, 10, Holdings::new(), Vec::new()));
        assert_eq!(intents, vec![Intent::NoAction]);
    }
}
