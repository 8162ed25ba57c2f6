use std::collections::BTreeSet;

use anyhow::{Result, bail};
use clap::Parser;
use coil_core::{EngineConfig, GridConfig, Routing, Session, StopReason};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 2000)]
    ticks: u32,
    /// Number of independent sessions, each with its own derived seed
    #[arg(short, long, default_value_t = 16)]
    runs: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn check_invariants(session: &Session) -> Result<()> {
    let body = session.body();
    let config = body.config();
    let mut seen = BTreeSet::new();
    for cell in body.cells() {
        if !config.contains(cell) {
            bail!("Invariant failed: body cell {cell} outside the grid");
        }
        if !seen.insert(cell) {
            bail!("Invariant failed: body overlaps itself at {cell}");
        }
    }
    if let Some(target) = session.target()
        && body.contains(target)
    {
        bail!("Invariant failed: target {target} placed on the body");
    }
    Ok(())
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} runs of {} ticks...", args.seed, args.runs, args.ticks);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for run in 0..args.runs {
        let session_seed = rng.next_u64();
        let side = choose(&mut rng, &[5_u32, 8, 12, 16, 24]);
        let config = EngineConfig {
            grid: GridConfig { width: side, height: side, wrap: choose(&mut rng, &[false, true]) },
            routing: choose(&mut rng, &[Routing::Shortest, Routing::MobilityWeighted]),
            tour_fallback: choose(&mut rng, &[true, false]),
            ..EngineConfig::default()
        };
        let mut session = Session::new(session_seed, config)?;

        let mut total_ticks = 0;
        let mut best_score = 0;
        let mut events = 0;
        while total_ticks < args.ticks {
            let result = session.advance(10)?;
            total_ticks += result.simulated_ticks;
            events += session.take_log().len();
            best_score = best_score.max(session.score());
            check_invariants(&session)?;
            match result.stop_reason {
                StopReason::BudgetExhausted => {}
                StopReason::Trapped | StopReason::BoardFilled => {
                    session.reset()?;
                    total_ticks += 1;
                }
            }
        }
        println!(
            "run {run}: seed={session_seed} grid={side}x{side} wrap={} routing={:?} best_score={best_score} resets={} events={events}",
            config.grid.wrap,
            config.routing,
            session.resets()
        );
    }

    println!("Fuzz run complete, invariants held.");
    Ok(())
}
