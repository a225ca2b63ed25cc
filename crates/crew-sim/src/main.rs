use std::path::PathBuf;

use clap::Parser;

use crew_sim::config::SimConfig;
use crew_sim::logging::init_logging;
use crew_sim::runner::SimRunner;

/// Self-play harness: bots claim tasks and play whole missions.
#[derive(Debug, Parser)]
#[command(
    name = "crew-sim",
    author,
    version,
    about = "Deterministic self-play for the cooperative trick-taking engine"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "sim/sim.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for game generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the table size.
    #[arg(long, value_name = "COUNT")]
    players: Option<usize>,

    /// Override the task difficulty target.
    #[arg(long, value_name = "TARGET")]
    difficulty: Option<u32>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }
    if let Some(games) = cli.games {
        config.games.count = games;
    }
    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }
    if let Some(players) = cli.players {
        config.games.players = players;
    }
    if let Some(difficulty) = cli.difficulty {
        config.games.difficulty = difficulty;
    }

    config.validate()?;

    let outputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let players = config.games.players;

    println!(
        "Loaded configuration '{run_id}': {games} game{} at {players} players, difficulty {}",
        if games == 1 { "" } else { "s" },
        config.games.difficulty
    );

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = SimRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: no games played.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Run '{run_id}' complete: {} games, {} won, {} lost → {} rows at {}",
        summary.games_played,
        summary.successes,
        summary.failures,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
