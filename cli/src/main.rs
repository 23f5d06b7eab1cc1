//! Command-line runner for the market simulator
//!
//! Loads a `SimulationConfig` (and optionally a broadcast event pool)
//! from JSON, runs the simulation to completion, prints a summary, and
//! writes the ledger and inventory-snapshot history as JSON Lines.
//!
//! Exit codes: 0 on a completed or aborted run, 1 on any fatal error
//! (bad config, invariant violation, persistence failure).

use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use market_simulator_core_rs::{
    RoundOrchestrator, SimulationConfig, StaticBroadcastSource,
};

#[derive(Parser)]
#[command(name = "market-sim")]
#[command(about = "Deterministic multi-agent barter-market simulator")]
struct Cli {
    /// Path to the simulation config (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Path to a broadcast event pool (JSON array); quiet rounds if omitted
    #[arg(short, long)]
    broadcasts: Option<PathBuf>,

    /// Override the configured round count
    #[arg(long)]
    rounds: Option<usize>,

    /// Override the configured RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for ledger.jsonl and snapshots.jsonl
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config_text = fs::read_to_string(&cli.config)
        .map_err(|e| format!("reading {}: {}", cli.config.display(), e))?;
    let mut config: SimulationConfig = serde_json::from_str(&config_text)
        .map_err(|e| format!("parsing {}: {}", cli.config.display(), e))?;

    if let Some(rounds) = cli.rounds {
        config.rounds = rounds;
    }
    if let Some(seed) = cli.seed {
        config.rng_seed = seed;
    }

    let mut orchestrator =
        RoundOrchestrator::new(config).map_err(|e| e.to_string())?;

    if let Some(path) = &cli.broadcasts {
        let pool_text = fs::read_to_string(path)
            .map_err(|e| format!("reading {}: {}", path.display(), e))?;
        let source = StaticBroadcastSource::from_json(&pool_text)
            .map_err(|e| format!("parsing {}: {}", path.display(), e))?;
        orchestrator = orchestrator.with_broadcast(Box::new(source));
    }

    let summary = orchestrator.run().map_err(|e| e.to_string())?;

    println!("rounds completed: {}", summary.rounds_completed);
    println!("trades executed:  {}", summary.total_trades);
    println!("survivors:        {}", summary.survivors);
    if summary.aborted {
        println!("run was aborted externally");
    }

    fs::create_dir_all(&cli.out_dir)
        .map_err(|e| format!("creating {}: {}", cli.out_dir.display(), e))?;

    let ledger_path = cli.out_dir.join("ledger.jsonl");
    let mut ledger_out = BufWriter::new(
        File::create(&ledger_path)
            .map_err(|e| format!("creating {}: {}", ledger_path.display(), e))?,
    );
    orchestrator
        .export_ledger(&mut ledger_out)
        .map_err(|e| e.to_string())?;

    let snapshots_path = cli.out_dir.join("snapshots.jsonl");
    let mut snapshots_out = BufWriter::new(
        File::create(&snapshots_path)
            .map_err(|e| format!("creating {}: {}", snapshots_path.display(), e))?,
    );
    orchestrator
        .export_snapshots(&mut snapshots_out)
        .map_err(|e| e.to_string())?;

    println!("wrote {}", ledger_path.display());
    println!("wrote {}", snapshots_path.display());
    Ok(())
}
