use std::path::PathBuf;

use clap::Parser;

use jass_bench::config::{BenchmarkConfig, ResolvedOutputs};
use jass_bench::logging::init_logging;
use jass_bench::tournament::TournamentRunner;

/// Match benchmarking harness for Jass players.
#[derive(Debug, Parser)]
#[command(
    name = "jass-bench",
    author,
    version,
    about = "Deterministic Schieber Jass match harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of matches to play.
    #[arg(long, value_name = "COUNT")]
    matches: Option<usize>,

    /// Override the RNG seed the match seeds are drawn from.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no match is played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(matches) = cli.matches {
        config.matches.count = matches;
    }

    if let Some(seed) = cli.seed {
        config.matches.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let matches = config.matches.count;
    let seating = config
        .agents
        .iter()
        .map(|agent| agent.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    println!("Loaded configuration '{run_id}': {matches} matches, seating [{seating}]");

    let runner = TournamentRunner::new(config.clone(), outputs.clone())?;

    if cli.validate_only {
        println!("Validation-only mode: no matches played.");
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} matches, {} rows at {}",
        summary.matches_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!(
        "Wins: team 1 {} / team 2 {}",
        summary.wins[0], summary.wins[1]
    );
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
