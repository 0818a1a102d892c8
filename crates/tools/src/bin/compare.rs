use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chase_core::{Algorithm, Game, StrategyKind};
use chase_tools::config_file::load_or_default;
use chase_tools::init_tracing;
use chase_tools::report::{AlgorithmReport, render_table};
use clap::Parser;

/// Plays the same seeds once per enemy path algorithm and compares outcomes.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 10)]
    games: u32,
    /// First seed; game `i` uses `seed + i`
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Path strategies to compare (default: all five)
    #[arg(short, long, value_delimiter = ',')]
    algorithms: Vec<StrategyKind>,
    #[arg(long)]
    json: bool,
}

fn selected_algorithms(kinds: &[StrategyKind]) -> Result<Vec<Algorithm>> {
    if kinds.is_empty() {
        return Ok(Algorithm::ALL.to_vec());
    }
    kinds
        .iter()
        .map(|kind| match kind.algorithm() {
            Some(algorithm) => Ok(algorithm),
            None => bail!("`{kind}` is not a path algorithm"),
        })
        .collect()
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let base = load_or_default(args.config.as_deref())?;
    let algorithms = selected_algorithms(&args.algorithms)?;

    let mut rows = Vec::with_capacity(algorithms.len());
    for algorithm in algorithms {
        let config = base.clone().with_enemy_strategy(StrategyKind::from_algorithm(algorithm));
        let mut report = AlgorithmReport::default();
        for offset in 0..u64::from(args.games) {
            let seed = args.seed.wrapping_add(offset);
            let started = Instant::now();
            let mut game = Game::new(seed, config.clone())
                .with_context(|| format!("failed to start seed {seed}"))?;
            let summary = game.run_to_end().with_context(|| format!("{algorithm:?} on seed {seed}"))?;
            report.record(&summary, started.elapsed());
        }
        tracing::info!(?algorithm, games = report.games, captured = report.captured, "algorithm done");
        rows.push((algorithm, report));
    }

    if args.json {
        let json: Vec<_> = rows
            .iter()
            .map(|(algorithm, report)| serde_json::json!({ "algorithm": algorithm, "report": report }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        print!("{}", render_table(&rows));
    }
    Ok(())
}
