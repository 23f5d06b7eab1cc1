//! Orchestrator engine
//!
//! Main simulation loop integrating all components:
//! - Broadcast fan-out (opaque market news, logged only)
//! - Per-agent turns in randomized order (seeded shuffle)
//! - Survival mechanics (energy decay, consumption, operational cost,
//!   bankruptcy and death)
//! - Intent dispatch from the decision layer into the market
//! - End-of-round settlement (expiry sweep, inventory snapshots,
//!   conservation audit)
//!
//! # Round structure
//!
//! ```text
//! For each round r:
//! 1. BroadcastPhase: draw one event, fan out read-only
//! 2. TurnPhase, per living agent in shuffled order:
//!    a. apply energy decay
//!    b. consume survival asset if below threshold and available
//!    c. deliver context, dispatch the policy's intents to the market
//!       (rejections are logged and skipped, never abort the round)
//!    d. deduct operational cost; kill on bankruptcy or zero energy
//! 3. SettlementPhase: expire stale offers, snapshot every agent,
//!    audit reservations and conservation, advance the clock
//! ```
//!
//! # Failure semantics
//!
//! A rejected intent is an expected outcome: logged, surfaced in the
//! round result, turn continues. Structural errors (unknown agent id,
//! invariant violation, persistence failure) abort the run and are not
//! resumable.
//!
//! # Determinism
//!
//! All randomness flows through one seeded xorshift64* RNG: the turn
//! shuffle and the broadcast draw. Same seed + same config + same
//! policies = identical trades and snapshots.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::broadcast::{BroadcastEvent, BroadcastSource, StaticBroadcastSource};
use crate::core::time::RoundClock;
use crate::decision::{
    AgentView, DecisionPolicy, Intent, PassivePolicy, ScriptedPolicy, SurvivalPolicy, TurnContext,
};
use crate::ledger::InventorySnapshotStore;
use crate::market::{Market, MarketError};
use crate::models::agent::Agent;
use crate::models::asset::{AssetKind, Holdings};
use crate::models::event::{Event, EventLog};
use crate::models::registry::AgentRegistry;
use crate::rng::RngManager;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete simulation configuration
///
/// All parameters are supplied at construction; nothing mutates at
/// runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of rounds to simulate
    pub rounds: usize,

    /// RNG seed for deterministic turn order and broadcast draws
    pub rng_seed: u64,

    /// Per-agent configuration
    pub agent_configs: Vec<AgentConfig>,

    /// Survival mechanics parameters
    #[serde(default)]
    pub survival: SurvivalParams,

    /// How many recent ledger entries the decision layer sees
    #[serde(default = "default_ledger_tail_len")]
    pub ledger_tail_len: usize,
}

fn default_ledger_tail_len() -> usize {
    20
}

/// Per-agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Unique agent identifier
    pub id: String,

    /// Opening cash balance (cents)
    pub initial_cash: i64,

    /// Opening holdings per asset kind
    #[serde(default)]
    pub initial_holdings: Holdings,

    /// Opening energy level
    pub initial_energy: i32,

    /// Decision policy driving this agent's turns
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Policy selection for an agent
///
/// Built-in deterministic policies; external drivers (e.g. an LLM
/// harness) bypass this enum via `RoundOrchestrator::set_policy`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyConfig {
    /// Never act (baseline)
    #[default]
    Passive,

    /// Deterministic subsistence heuristic
    Survival {
        /// Start buying food at or below this energy level
        energy_alert: i32,
        /// Unit price bid when posting a Buy offer
        bid_price: i64,
        /// Unit price asked when selling surplus
        ask_price: i64,
    },

    /// Fixed per-turn intent queue
    ///
    /// NOTE: Available in all builds to support integration testing,
    /// but should only be used in test code.
    Scripted {
        /// One intent list per turn, replayed in order
        turns: Vec<Vec<Intent>>,
    },
}

/// Survival mechanics parameters
///
/// Defaults follow the reference scenario: decay 1 energy per round,
/// eat an apple below 5 energy for +3, capped at 10, with a 100-cent
/// operational cost per turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SurvivalParams {
    /// Energy lost at the start of every turn
    pub energy_decay_per_round: i32,

    /// Consume the survival asset when energy falls below this
    pub consumption_threshold: i32,

    /// Energy restored per unit consumed
    pub consumption_recovery: i32,

    /// Upper bound on energy (recovery clamps here)
    pub max_energy: i32,

    /// Cash deducted at the end of every turn (sink)
    pub operational_cost: i64,

    /// The asset consumed for energy
    pub survival_asset: AssetKind,

    /// Rounds an open offer lives, counting its creation round;
    /// `None` disables expiry
    pub offer_ttl_rounds: Option<usize>,
}

impl Default for SurvivalParams {
    fn default() -> Self {
        Self {
            energy_decay_per_round: 1,
            consumption_threshold: 5,
            consumption_recovery: 3,
            max_energy: 10,
            operational_cost: 100,
            survival_asset: AssetKind::Apple,
            offer_ttl_rounds: None,
        }
    }
}

// ============================================================================
// Results & Errors
// ============================================================================

/// Result of a single round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    /// Round number
    pub round: usize,

    /// ID of this round's broadcast event, if any
    pub broadcast_id: Option<String>,

    /// Trades executed this round
    pub trades: usize,

    /// Intents rejected this round (expected outcomes, not faults)
    pub rejections: usize,

    /// Agents that died this round
    pub deaths: usize,

    /// Offers expired at settlement
    pub expired: usize,

    /// Inventory snapshots captured at settlement
    pub snapshots: usize,
}

/// Summary of a complete run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Rounds fully settled
    pub rounds_completed: usize,

    /// Whether the run stopped on an external abort
    pub aborted: bool,

    /// Total trades in the ledger
    pub total_trades: usize,

    /// Agents still alive at the end
    pub survivors: usize,
}

/// Fatal simulation errors
///
/// Everything here aborts the run with full context; per-intent
/// validation rejections never surface through this type.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Orchestrator referenced an agent the registry has never seen
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// Internal consistency check failed; state may be corrupt
    #[error("Invariant violation at round {round}: {detail}")]
    InvariantViolation { round: usize, detail: String },

    /// Ledger or snapshot write failure
    #[error("Persistence failure: {0}")]
    Persistence(#[from] std::io::Error),
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Drives one simulation run
///
/// Owns the market (and through it all economic state), the snapshot
/// store, the event log and the RNG. Multiple orchestrators in one
/// process are fully isolated: nothing is shared, so parameter sweeps
/// can run side by side.
///
/// # Example
///
/// ```rust
/// use market_simulator_core_rs::orchestrator::{
///     AgentConfig, PolicyConfig, RoundOrchestrator, SimulationConfig, SurvivalParams,
/// };
/// use market_simulator_core_rs::Holdings;
///
/// let config = SimulationConfig {
///     rounds: 5,
///     rng_seed: 12345,
///     agent_configs: vec![AgentConfig {
///         id: "alice".to_string(),
///         initial_cash: 10_000,
///         initial_holdings: Holdings::new(),
///         initial_energy: 10,
///         policy: PolicyConfig::Passive,
///     }],
///     survival: SurvivalParams::default(),
///     ledger_tail_len: 20,
/// };
///
/// let mut orchestrator = RoundOrchestrator::new(config).unwrap();
/// let summary = orchestrator.run().unwrap();
/// assert_eq!(summary.rounds_completed, 5);
/// ```
pub struct RoundOrchestrator {
    /// Market clearinghouse (agents, board, ledger)
    market: Market,

    /// Round counter
    clock: RoundClock,

    /// Deterministic RNG (turn shuffle, broadcast draw)
    rng: RngManager,

    /// Per-agent decision policies
    policies: HashMap<String, Box<dyn DecisionPolicy>>,

    /// Source of per-round broadcast events
    broadcast: Box<dyn BroadcastSource>,

    /// Survival mechanics parameters
    survival: SurvivalParams,

    /// Ledger tail length for turn contexts
    ledger_tail_len: usize,

    /// Per-round inventory snapshots
    snapshot_store: InventorySnapshotStore,

    /// Event log (all simulation events)
    event_log: EventLog,

    /// External abort flag, checked between turns
    abort: Arc<AtomicBool>,

    /// Cash in the system at construction (conservation baseline)
    initial_total_cash: i64,

    /// Asset units per kind at construction (conservation baseline)
    initial_assets: [u64; AssetKind::COUNT],

    /// Cumulative operational-cost sink
    cost_sink: i64,

    /// Cumulative consumption sink per kind
    consumption_sink: [u64; AssetKind::COUNT],
}

impl RoundOrchestrator {
    /// Create a new orchestrator from configuration
    ///
    /// Initializes agents, policies and RNG. Broadcast defaults to
    /// silent; install a source with [`RoundOrchestrator::with_broadcast`].
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let agents: Vec<Agent> = config
            .agent_configs
            .iter()
            .map(|ac| {
                Agent::new(
                    ac.id.clone(),
                    ac.initial_cash,
                    ac.initial_holdings,
                    ac.initial_energy,
                )
            })
            .collect();
        let registry = AgentRegistry::new(agents);

        let initial_total_cash = registry.total_cash();
        let mut initial_assets = [0u64; AssetKind::COUNT];
        for kind in AssetKind::ALL {
            initial_assets[kind.index()] = registry.total_asset(kind);
        }

        let mut policies: HashMap<String, Box<dyn DecisionPolicy>> = HashMap::new();
        for agent_config in &config.agent_configs {
            let policy: Box<dyn DecisionPolicy> = match &agent_config.policy {
                PolicyConfig::Passive => Box::new(PassivePolicy),
                PolicyConfig::Survival {
                    energy_alert,
                    bid_price,
                    ask_price,
                } => Box::new(SurvivalPolicy::new(
                    config.survival.survival_asset,
                    *energy_alert,
                    *bid_price,
                    *ask_price,
                )),
                PolicyConfig::Scripted { turns } => Box::new(ScriptedPolicy::new(turns.clone())),
            };
            policies.insert(agent_config.id.clone(), policy);
        }

        Ok(Self {
            market: Market::new(registry),
            clock: RoundClock::new(config.rounds),
            rng: RngManager::new(config.rng_seed),
            policies,
            broadcast: Box::new(StaticBroadcastSource::silent()),
            survival: config.survival,
            ledger_tail_len: config.ledger_tail_len,
            snapshot_store: InventorySnapshotStore::new(),
            event_log: EventLog::new(),
            abort: Arc::new(AtomicBool::new(false)),
            initial_total_cash,
            initial_assets,
            cost_sink: 0,
            consumption_sink: [0; AssetKind::COUNT],
        })
    }

    /// Install a broadcast source (builder style)
    pub fn with_broadcast(mut self, source: Box<dyn BroadcastSource>) -> Self {
        self.broadcast = source;
        self
    }

    /// Replace one agent's decision policy
    ///
    /// This is the hook for external drivers: anything implementing
    /// `DecisionPolicy` can steer an agent.
    pub fn set_policy(
        &mut self,
        agent_id: &str,
        policy: Box<dyn DecisionPolicy>,
    ) -> Result<(), SimulationError> {
        if !self.market.registry().contains(agent_id) {
            return Err(SimulationError::UnknownAgent(agent_id.to_string()));
        }
        self.policies.insert(agent_id.to_string(), policy);
        Ok(())
    }

    /// Validate configuration
    fn validate_config(config: &SimulationConfig) -> Result<(), SimulationError> {
        if config.rounds == 0 {
            return Err(SimulationError::InvalidConfig(
                "rounds must be > 0".to_string(),
            ));
        }
        if config.agent_configs.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "Must have at least one agent".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        for agent_config in &config.agent_configs {
            if !ids.insert(&agent_config.id) {
                return Err(SimulationError::InvalidConfig(format!(
                    "Duplicate agent ID: {}",
                    agent_config.id
                )));
            }
            if agent_config.initial_cash < 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "Agent {} has negative initial cash",
                    agent_config.id
                )));
            }
            if agent_config.initial_energy < 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "Agent {} has negative initial energy",
                    agent_config.id
                )));
            }
        }

        let s = &config.survival;
        if s.energy_decay_per_round < 0
            || s.consumption_recovery < 0
            || s.operational_cost < 0
            || s.max_energy <= 0
        {
            return Err(SimulationError::InvalidConfig(
                "survival parameters must be non-negative (max_energy positive)".to_string(),
            ));
        }
        if s.offer_ttl_rounds == Some(0) {
            return Err(SimulationError::InvalidConfig(
                "offer_ttl_rounds must be >= 1 when set".to_string(),
            ));
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current round (0-indexed; equals rounds settled so far)
    pub fn current_round(&self) -> usize {
        self.clock.current_round()
    }

    /// Get the market
    pub fn market(&self) -> &Market {
        &self.market
    }

    /// Get the event log
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Get the inventory snapshot history
    pub fn snapshot_store(&self) -> &InventorySnapshotStore {
        &self.snapshot_store
    }

    /// Cumulative operational-cost sink (cents)
    pub fn cost_sink(&self) -> i64 {
        self.cost_sink
    }

    /// Cumulative consumption sink for one kind (units)
    pub fn consumption_sink(&self, kind: AssetKind) -> u64 {
        self.consumption_sink[kind.index()]
    }

    /// Handle for aborting the run from another thread
    ///
    /// Setting the flag stops the run at the next turn boundary; an
    /// in-flight market operation is never interrupted.
    pub fn abort_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }

    // ========================================================================
    // Run Loop
    // ========================================================================

    /// Run to completion: configured round count, all agents dead, or
    /// external abort, whichever comes first
    pub fn run(&mut self) -> Result<RunSummary, SimulationError> {
        while !self.clock.is_finished()
            && self.market.registry().living_count() > 0
            && !self.abort.load(Ordering::Relaxed)
        {
            self.run_round()?;
        }

        Ok(RunSummary {
            rounds_completed: self.clock.current_round(),
            aborted: self.abort.load(Ordering::Relaxed),
            total_trades: self.market.ledger().len(),
            survivors: self.market.registry().living_count(),
        })
    }

    /// Execute one complete round
    pub fn run_round(&mut self) -> Result<RoundResult, SimulationError> {
        let round = self.clock.current_round();
        let params = self.survival;

        // PHASE 1: BROADCAST
        // One event, fanned out read-only; never touches economic state.
        let broadcast = self.broadcast.draw(&mut self.rng);
        if let Some(event) = &broadcast {
            self.event_log.log(Event::Broadcast {
                round,
                event_id: event.id.clone(),
                category: event.category.clone(),
            });
        }

        // PHASE 2: TURNS
        // Seeded shuffle over the full roster; dead agents are skipped
        // inside the loop so the shuffle consumes the same amount of
        // randomness regardless of who is alive.
        let mut turn_order: Vec<String> = self.market.registry().ids().to_vec();
        self.rng.shuffle(&mut turn_order);

        let trades_before = self.market.ledger().len();
        let mut rejections = 0;
        let mut deaths = 0;

        for agent_id in turn_order {
            // Abort checkpoint: between turns only, never mid-operation.
            if self.abort.load(Ordering::Relaxed) {
                break;
            }

            let alive = self
                .market
                .registry()
                .get(&agent_id)
                .ok_or_else(|| SimulationError::UnknownAgent(agent_id.clone()))?
                .is_alive();
            if !alive {
                continue;
            }

            // STEP 1: ENERGY DECAY
            self.agent_mut(&agent_id)?
                .decay_energy(params.energy_decay_per_round);

            // STEP 2: CONSUMPTION
            // Eat one unit of the survival asset if hungry and a unit is
            // available (units reserved by the agent's own Sell offers
            // are not edible). Pure sink: no counterpart credit.
            let energy = self.agent_mut(&agent_id)?.energy();
            if energy < params.consumption_threshold {
                let available = self
                    .market
                    .available_asset(&agent_id, params.survival_asset)
                    .map_err(|e| self.escalate(round, e))?;
                if available >= 1 {
                    let agent = self.agent_mut(&agent_id)?;
                    agent
                        .remove_asset(params.survival_asset, 1)
                        .map_err(|e| SimulationError::InvariantViolation {
                            round,
                            detail: e.to_string(),
                        })?;
                    agent.restore_energy(params.consumption_recovery, params.max_energy);
                    let energy_after = agent.energy();
                    self.consumption_sink[params.survival_asset.index()] += 1;
                    self.event_log.log(Event::Consumption {
                        round,
                        agent_id: agent_id.clone(),
                        kind: params.survival_asset,
                        energy_after,
                    });
                }
            }

            // STEP 3: DECISION DISPATCH
            // Rejected intents are logged and skipped; the turn goes on.
            let ctx = Self::build_context(
                &self.market,
                &agent_id,
                round,
                self.ledger_tail_len,
                broadcast.as_ref(),
            )
            .map_err(|e| self.escalate(round, e))?;
            let intents = self
                .policies
                .get_mut(&agent_id)
                .ok_or_else(|| SimulationError::UnknownAgent(agent_id.clone()))?
                .decide(&ctx);
            for intent in intents {
                if self.dispatch(&agent_id, intent, round)? {
                    rejections += 1;
                }
            }

            // STEP 4: OPERATIONAL COST & DEATH CHECK
            let (cash_after, energy_after) = {
                let agent = self.agent_mut(&agent_id)?;
                agent.charge(params.operational_cost);
                (agent.cash(), agent.energy())
            };
            self.cost_sink += params.operational_cost;
            self.event_log.log(Event::OperationalCost {
                round,
                agent_id: agent_id.clone(),
                amount: params.operational_cost,
                cash_after,
            });

            if cash_after < 0 || energy_after <= 0 {
                self.agent_mut(&agent_id)?.kill();
                let cancelled = self
                    .market
                    .force_liquidate(&agent_id)
                    .map_err(|e| self.escalate(round, e))?;
                self.event_log.log(Event::AgentDied {
                    round,
                    agent_id: agent_id.clone(),
                    cancelled_offers: cancelled.len(),
                });
                deaths += 1;
            } else {
                // The cost sink shrank total cash without touching the
                // board; release any reservation it no longer backs.
                let released = self
                    .market
                    .release_overcommitted(&agent_id)
                    .map_err(|e| self.escalate(round, e))?;
                for offer_id in released {
                    self.event_log.log(Event::OfferCancelled {
                        round,
                        offer_id,
                        agent_id: agent_id.clone(),
                        reason: "reservation no longer backed after operational cost".to_string(),
                    });
                }
            }
        }

        // PHASE 3: SETTLEMENT
        let mut expired = 0;
        if let Some(ttl) = params.offer_ttl_rounds {
            if round + 1 >= ttl {
                for (offer_id, owner_id) in self.market.expire_offers(round + 1 - ttl) {
                    self.event_log.log(Event::OfferExpired {
                        round,
                        offer_id,
                        agent_id: owner_id,
                    });
                    expired += 1;
                }
            }
        }

        let snapshots = self.snapshot_store.capture_all(self.market.registry(), round);
        self.audit(round)?;

        let living_agents = self.market.registry().living_count();
        self.event_log.log(Event::RoundSettled {
            round,
            living_agents,
            snapshots,
        });
        self.clock.advance_round();

        Ok(RoundResult {
            round,
            broadcast_id: broadcast.map(|e| e.id),
            trades: self.market.ledger().len() - trades_before,
            rejections,
            deaths,
            expired,
            snapshots,
        })
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write the trade ledger as JSON Lines
    pub fn export_ledger<W: Write>(&self, writer: &mut W) -> Result<(), SimulationError> {
        self.market.ledger().export_jsonl(writer)?;
        Ok(())
    }

    /// Write the inventory snapshot history as JSON Lines
    pub fn export_snapshots<W: Write>(&self, writer: &mut W) -> Result<(), SimulationError> {
        self.snapshot_store.export_jsonl(writer)?;
        Ok(())
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Dispatch one intent to the market
    ///
    /// Returns `Ok(true)` if the intent was rejected (logged, skipped),
    /// `Ok(false)` on success or `NoAction`, and `Err` only for
    /// structural failures.
    fn dispatch(
        &mut self,
        agent_id: &str,
        intent: Intent,
        round: usize,
    ) -> Result<bool, SimulationError> {
        let outcome: Result<(), MarketError> = match intent {
            Intent::NoAction => return Ok(false),
            Intent::CreateOffer {
                side,
                kind,
                quantity,
                unit_price,
            } => self
                .market
                .create_offer(agent_id, side, kind, quantity, unit_price, round)
                .map(|offer_id| {
                    self.event_log.log(Event::OfferCreated {
                        round,
                        offer_id,
                        agent_id: agent_id.to_string(),
                        side,
                        kind,
                        quantity,
                        unit_price,
                    });
                }),
            Intent::AcceptOffer { offer_id } => {
                self.market.accept_offer(agent_id, offer_id, round).map(|trade| {
                    self.event_log.log(Event::TradeExecuted {
                        round,
                        trade_id: trade.id,
                        buyer_id: trade.buyer_id,
                        seller_id: trade.seller_id,
                        kind: trade.kind,
                        quantity: trade.quantity,
                        unit_price: trade.unit_price,
                    });
                })
            }
            Intent::CancelOffer { offer_id } => {
                self.market.cancel_offer(agent_id, offer_id).map(|()| {
                    self.event_log.log(Event::OfferCancelled {
                        round,
                        offer_id,
                        agent_id: agent_id.to_string(),
                        reason: "cancelled by owner".to_string(),
                    });
                })
            }
        };

        match outcome {
            Ok(()) => Ok(false),
            Err(e) if e.is_rejection() => {
                self.event_log.log(Event::IntentRejected {
                    round,
                    agent_id: agent_id.to_string(),
                    reason: e.to_string(),
                });
                Ok(true)
            }
            Err(e) => Err(self.escalate(round, e)),
        }
    }

    /// Build the read-only turn context for one agent
    fn build_context(
        market: &Market,
        agent_id: &str,
        round: usize,
        ledger_tail_len: usize,
        broadcast: Option<&BroadcastEvent>,
    ) -> Result<TurnContext, MarketError> {
        let agent = market
            .registry()
            .get(agent_id)
            .ok_or_else(|| MarketError::UnknownAgent(agent_id.to_string()))?;

        let mut available = Holdings::new();
        for kind in AssetKind::ALL {
            let avail = market.available_asset(agent_id, kind)?.max(0) as u32;
            available = available.with(kind, avail);
        }

        Ok(TurnContext {
            round,
            agent: AgentView {
                id: agent_id.to_string(),
                cash: agent.cash(),
                available_cash: market.available_cash(agent_id)?,
                holdings: *agent.holdings(),
                available,
                energy: agent.energy(),
            },
            open_offers: market.book().iter_active().cloned().collect(),
            recent_trades: market.ledger().recent(ledger_tail_len).to_vec(),
            broadcast: broadcast.cloned(),
        })
    }

    /// End-of-round consistency audit; any failure is fatal
    fn audit(&self, round: usize) -> Result<(), SimulationError> {
        self.market
            .check_reservations()
            .map_err(|detail| SimulationError::InvariantViolation { round, detail })?;

        let total_cash = self.market.registry().total_cash();
        if total_cash + self.cost_sink != self.initial_total_cash {
            return Err(SimulationError::InvariantViolation {
                round,
                detail: format!(
                    "cash not conserved: current {} + sink {} != initial {}",
                    total_cash, self.cost_sink, self.initial_total_cash
                ),
            });
        }

        for kind in AssetKind::ALL {
            let total = self.market.registry().total_asset(kind);
            let sunk = self.consumption_sink[kind.index()];
            if total + sunk != self.initial_assets[kind.index()] {
                return Err(SimulationError::InvariantViolation {
                    round,
                    detail: format!(
                        "{} not conserved: current {} + consumed {} != initial {}",
                        kind.as_str(),
                        total,
                        sunk,
                        self.initial_assets[kind.index()]
                    ),
                });
            }
        }

        Ok(())
    }

    fn agent_mut(&mut self, agent_id: &str) -> Result<&mut Agent, SimulationError> {
        self.market
            .registry_mut()
            .get_mut(agent_id)
            .ok_or_else(|| SimulationError::UnknownAgent(agent_id.to_string()))
    }

    /// Escalate a market error that reached a structural code path
    fn escalate(&self, round: usize, error: MarketError) -> SimulationError {
        match error {
            MarketError::UnknownAgent(id) => SimulationError::UnknownAgent(id),
            other => SimulationError::InvariantViolation {
                round,
                detail: other.to_string(),
            },
        }
    }
}
