use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use coil_core::{EngineConfig, NavMode, Routing, Session, StopReason};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoutingArg {
    Shortest,
    Weighted,
}

impl From<RoutingArg> for Routing {
    fn from(arg: RoutingArg) -> Self {
        match arg {
            RoutingArg::Shortest => Routing::Shortest,
            RoutingArg::Weighted => Routing::MobilityWeighted,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about = "Run the navigator headlessly and report the outcome", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 5000)]
    ticks: u32,
    /// TOML engine config; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Toroidal grid
    #[arg(long)]
    wrap: bool,
    #[arg(long, value_enum)]
    routing: Option<RoutingArg>,
    /// Reset and keep going after a trap or a full board
    #[arg(long)]
    auto_reset: bool,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    ticks: u32,
    score: u32,
    best_score: u32,
    steps: u64,
    resets: u32,
    events: usize,
    body_len: usize,
    mode: NavMode,
    stop_reason: StopReason,
    snapshot_hash: u64,
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    EngineConfig::from_toml_str(&raw)
        .with_context(|| format!("Invalid engine config in {}", path.display()))
}

fn resolve_config(args: &Args) -> Result<EngineConfig> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.grid.width = width;
    }
    if let Some(height) = args.height {
        config.grid.height = height;
    }
    if args.wrap {
        config.grid.wrap = true;
    }
    if let Some(routing) = args.routing {
        config.routing = routing.into();
    }
    config.validate().context("Engine config rejected after applying flags")?;
    Ok(config)
}

fn run(args: &Args, config: EngineConfig) -> Result<Summary> {
    let mut session = Session::new(args.seed, config).context("Failed to start session")?;
    let mut remaining = args.ticks;
    let mut best_score = 0;
    let mut stop_reason = StopReason::BudgetExhausted;
    let mut events = 0;

    while remaining > 0 {
        let result = session.advance(remaining).context("Navigator produced an illegal move")?;
        remaining -= result.simulated_ticks;
        events += session.take_log().len();
        best_score = best_score.max(session.score());
        stop_reason = result.stop_reason;
        if stop_reason == StopReason::BudgetExhausted || !args.auto_reset {
            break;
        }
        info!(?stop_reason, score = session.score(), "episode ended, resetting");
        session.reset().context("Failed to reset session")?;
        events += session.take_log().len();
        remaining = remaining.saturating_sub(1);
    }

    Ok(Summary {
        seed: args.seed,
        ticks: args.ticks - remaining,
        score: session.score(),
        best_score,
        steps: session.steps(),
        resets: session.resets(),
        events,
        body_len: session.body().len(),
        mode: session.navigator().mode(),
        stop_reason,
        snapshot_hash: session.snapshot_hash(),
    })
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = resolve_config(&args)?;
    let summary = run(&args, config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!("Simulation complete.");
    println!("Stop reason: {:?}", summary.stop_reason);
    println!("Score: {} (best {})", summary.score, summary.best_score);
    println!("Steps: {}  Resets: {}  Body length: {}", summary.steps, summary.resets, summary.body_len);
    println!("Events: {}", summary.events);
    println!("Mode: {:?}", summary.mode);
    println!("Snapshot Hash: {}", summary.snapshot_hash);
    Ok(())
}
