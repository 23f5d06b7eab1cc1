//! Property tests for conservation and reservation invariants
//!
//! Random operation sequences against the market, and random full runs
//! through the orchestrator, must never create or destroy value: cash
//! and assets only move between agents or into the explicit sinks, and
//! `available >= 0` holds for every agent after every settled operation.

use market_simulator_core_rs::{
    Agent, AgentConfig, AgentRegistry, AssetKind, Holdings, Market, PolicyConfig,
    RoundOrchestrator, Side, SimulationConfig, SurvivalParams,
};
use proptest::prelude::*;

const AGENT_IDS: [&str; 3] = ["alice", "bob", "carol"];

fn fresh_market() -> Market {
    Market::new(AgentRegistry::new(vec![
        Agent::new(
            "alice".to_string(),
            10_000,
            Holdings::new().with(AssetKind::Apple, 4),
            10,
        ),
        Agent::new(
            "bob".to_string(),
            5_000,
            Holdings::new().with(AssetKind::Gold, 3),
            10,
        ),
        Agent::new(
            "carol".to_string(),
            2_000,
            Holdings::new().with(AssetKind::Chip, 6),
            10,
        ),
    ]))
}

/// One randomly drawn market operation; rejections are part of normal
/// operation and are simply ignored.
#[derive(Debug, Clone)]
enum Op {
    Create {
        agent: usize,
        side: Side,
        kind: usize,
        quantity: u32,
        unit_price: i64,
    },
    Accept { agent: usize, offer_id: u64 },
    Cancel { agent: usize, offer_id: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (
            0..3usize,
            prop_oneof![Just(Side::Buy), Just(Side::Sell)],
            0..3usize,
            1..6u32,
            1..2_000i64,
        )
            .prop_map(|(agent, side, kind, quantity, unit_price)| Op::Create {
                agent,
                side,
                kind,
                quantity,
                unit_price,
            }),
        (0..3usize, 1..40u64).prop_map(|(agent, offer_id)| Op::Accept { agent, offer_id }),
        (0..3usize, 1..40u64).prop_map(|(agent, offer_id)| Op::Cancel { agent, offer_id }),
    ]
}

proptest! {
    #[test]
    fn prop_market_ops_conserve_value(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut market = fresh_market();
        let initial_cash = market.registry().total_cash();
        let initial_assets: Vec<u64> = AssetKind::ALL
            .iter()
            .map(|&k| market.registry().total_asset(k))
            .collect();

        for (round, op) in ops.into_iter().enumerate() {
            match op {
                Op::Create { agent, side, kind, quantity, unit_price } => {
                    let _ = market.create_offer(
                        AGENT_IDS[agent],
                        side,
                        AssetKind::ALL[kind],
                        quantity,
                        unit_price,
                        round,
                    );
                }
                Op::Accept { agent, offer_id } => {
                    let _ = market.accept_offer(AGENT_IDS[agent], offer_id, round);
                }
                Op::Cancel { agent, offer_id } => {
                    let _ = market.cancel_offer(AGENT_IDS[agent], offer_id);
                }
            }

            // Invariants hold after every single operation, not just at
            // the end of the sequence.
            prop_assert_eq!(market.registry().total_cash(), initial_cash);
            for (i, &kind) in AssetKind::ALL.iter().enumerate() {
                prop_assert_eq!(market.registry().total_asset(kind), initial_assets[i]);
            }
            prop_assert!(market.check_reservations().is_ok());
        }
    }

    #[test]
    fn prop_full_runs_balance_against_sinks(
        seed in any::<u64>(),
        rounds in 1..8usize,
        cash in prop::collection::vec(200..10_000i64, 3),
        energy in prop::collection::vec(1..10i32, 3),
        apples in prop::collection::vec(0..5u32, 3),
        operational_cost in 0..200i64,
        ttl in prop::option::of(1..4usize),
    ) {
        let agent_configs = (0..3)
            .map(|i| AgentConfig {
                id: AGENT_IDS[i].to_string(),
                initial_cash: cash[i],
                initial_holdings: Holdings::new()
                    .with(AssetKind::Apple, apples[i])
                    .with(AssetKind::Gold, i as u32),
                initial_energy: energy[i],
                policy: PolicyConfig::Survival {
                    energy_alert: 5,
                    bid_price: 250,
                    ask_price: 400,
                },
            })
            .collect();

        let config = SimulationConfig {
            rounds,
            rng_seed: seed,
            agent_configs,
            survival: SurvivalParams {
                energy_decay_per_round: 1,
                consumption_threshold: 5,
                consumption_recovery: 3,
                max_energy: 10,
                operational_cost,
                survival_asset: AssetKind::Apple,
                offer_ttl_rounds: ttl,
            },
            ledger_tail_len: 20,
        };

        let initial_cash: i64 = cash.iter().sum();
        let initial_apples: u64 = apples.iter().map(|&a| a as u64).sum();

        let mut orchestrator = RoundOrchestrator::new(config).unwrap();
        // The per-round audit inside run() re-checks conservation and
        // reservations; any violation surfaces as Err here.
        orchestrator.run().unwrap();

        let registry = orchestrator.market().registry();
        prop_assert_eq!(
            registry.total_cash() + orchestrator.cost_sink(),
            initial_cash
        );
        prop_assert_eq!(
            registry.total_asset(AssetKind::Apple)
                + orchestrator.consumption_sink(AssetKind::Apple),
            initial_apples
        );
        prop_assert_eq!(registry.total_asset(AssetKind::Gold), 0 + 1 + 2);
        prop_assert_eq!(orchestrator.consumption_sink(AssetKind::Gold), 0);
    }
}
