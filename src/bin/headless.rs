//! Runs the simulation without a window and reports generation summaries.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use predprey::simulation::ecosystem::Ecosystem;
use predprey::simulation::params::Params;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "headless", version, about = "Run the predator/prey simulation without rendering")]
struct Cli {
    /// Parameter file (JSON); defaults are used when absent
    #[arg(short, long)]
    config: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value = "10000")]
    ticks: u64,

    /// Write the generation history as JSON to this file
    #[arg(long)]
    history: Option<PathBuf>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => match Params::load_from_file(path) {
            Ok(params) => params,
            Err(err) => {
                error!(%path, %err, "cannot load parameters");
                return ExitCode::FAILURE;
            }
        },
        None => Params::default(),
    };
    if cli.seed.is_some() {
        params.rng_seed = cli.seed;
    }

    let mut ecosystem: Ecosystem = match Ecosystem::new(params) {
        Ok(ecosystem) => ecosystem,
        Err(err) => {
            error!(%err, "invalid parameters");
            return ExitCode::FAILURE;
        }
    };

    let mut status = ExitCode::SUCCESS;
    for _ in 0..cli.ticks {
        if let Err(err) = ecosystem.step() {
            error!(%err, "stopping early");
            status = ExitCode::FAILURE;
            break;
        }
    }

    let census = ecosystem.census();
    info!(
        ticks = census.tick,
        generation = census.generation,
        predators = census.predators,
        prey = census.prey,
        deaths = census.deaths,
        "run finished"
    );

    if let Some(path) = &cli.history {
        let written = serde_json::to_string_pretty(ecosystem.history())
            .map_err(|err| err.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|err| err.to_string()));
        match written {
            Ok(()) => info!(path = %path.display(), "history written"),
            Err(err) => {
                error!(path = %path.display(), %err, "cannot write history");
                status = ExitCode::FAILURE;
            }
        }
    }

    let ledger = ecosystem.shutdown();
    info!(created = ledger.created, released = ledger.released, "policies released");
    status
}
