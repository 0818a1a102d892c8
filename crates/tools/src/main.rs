use std::path::PathBuf;

use anyhow::{Context, Result};
use chase_core::{Game, StrategyKind};
use chase_tools::config_file::load_or_default;
use chase_tools::init_tracing;
use clap::Parser;

/// Runs one chase headlessly and prints how it ended.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// JSON or TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Replace the enemy blend with this single strategy
    #[arg(short, long)]
    enemy: Option<StrategyKind>,
    /// Print one JSON snapshot per half-turn
    #[arg(long)]
    trace: bool,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(kind) = args.enemy {
        config = config.with_enemy_strategy(kind);
    }
    let mut game = Game::new(args.seed, config)
        .with_context(|| format!("failed to start a game for seed {}", args.seed))?;

    while !game.is_over() {
        game.step()?;
        if args.trace {
            println!("{}", serde_json::to_string(&game.snapshot())?);
        }
    }
    let summary = game.summary();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!("Seed: {}", summary.seed);
    println!("Map: {}x{}", game.map().width(), game.map().height());
    println!("Outcome: {:?}", summary.status);
    println!("Steps: {} ({} good)", summary.steps, summary.good_steps);
    println!("Score: {:.1}", summary.score);
    println!("Searches: {} (mean nodes {:.1})", summary.searches.len(), summary.mean_nodes_explored());
    println!("Snapshot Hash: {}", game.snapshot_hash());
    Ok(())
}
