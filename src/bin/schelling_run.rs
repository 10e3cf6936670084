//! Headless Schelling Simulation Runner
//!
//! Runs the segregation model until it settles and reports per-round
//! unsatisfied counts as text or JSON. Stands in for a graphical shell:
//! it only calls the engine API and reads its outputs.

use clap::Parser;
use schelling_sim::core::error::Result;
use schelling_sim::sim::{run, RunOutcome, SimConfig, SimGrid};
use serde::Serialize;

/// Headless Schelling Simulation Runner
#[derive(Parser, Debug)]
#[command(name = "schelling_run")]
#[command(about = "Run the Schelling self-segregation simulation without a UI")]
struct Args {
    /// Grid rows
    #[arg(long, default_value_t = 30)]
    rows: usize,

    /// Grid columns
    #[arg(long, default_value_t = 30)]
    cols: usize,

    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Satisfaction threshold: the same-color neighbor fraction an agent
    /// must strictly exceed to stay put
    #[arg(long, default_value_t = 0.3)]
    threshold: f64,

    /// Each cell starts vacant with probability 1 in N
    #[arg(long, default_value_t = 10)]
    vacancy_odds: u32,

    /// Maximum rounds before giving up on convergence
    #[arg(long, default_value_t = 1000)]
    max_rounds: u32,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct RunReport {
    rows: usize,
    cols: usize,
    seed: u64,
    initial_percent: f64,
    outcome: RunOutcome,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("schelling_sim=info")
        .init();

    let args = Args::parse();

    let config = SimConfig {
        rows: args.rows,
        cols: args.cols,
        seed: args.seed,
        satisfaction_threshold: args.threshold,
        vacancy_odds: args.vacancy_odds,
    };

    let mut grid = SimGrid::new(&config)?;
    let initial_percent = grid.satisfied_percent();
    let outcome = run(&mut grid, args.max_rounds)?;

    if args.format == "json" {
        let report = RunReport {
            rows: args.rows,
            cols: args.cols,
            seed: args.seed,
            initial_percent,
            outcome,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Schelling Self-Segregation Simulator");
        println!("====================================");
        println!("Grid: {}x{} cells, seed {}", args.rows, args.cols, args.seed);
        println!("Initially satisfied: {:.1} %", initial_percent);
        println!();

        for (round, count) in outcome.unsatisfied_per_round.iter().enumerate() {
            println!("Round {:>4}: {} unsatisfied agents", round + 1, count);
        }

        if outcome.settled {
            println!(
                "\nSettled after {} rounds ({:.1} % satisfied)",
                outcome.rounds, outcome.final_percent
            );
        } else {
            println!(
                "\nNot settled after {} rounds ({:.1} % satisfied)",
                outcome.rounds, outcome.final_percent
            );
        }
    }

    Ok(())
}
