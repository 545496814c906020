//! Interactive viewer.
//!
//! Press Enter to start, Space to pause or resume.

use clap::Parser;
use macroquad::prelude::*;
use predprey::simulation::ecosystem::Ecosystem;
use predprey::simulation::params::Params;
use tracing::{error, info};

mod graphics;

#[derive(Parser, Debug)]
#[command(name = "predprey", version, about = "Predator/prey neuro-evolution viewer")]
struct Cli {
    /// Parameter file (JSON); defaults are used when absent
    #[arg(short, long)]
    config: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_params(cli: &Cli) -> Params {
    let mut params = match &cli.config {
        Some(path) => match Params::load_from_file(path) {
            Ok(params) => params,
            Err(err) => {
                error!(%path, %err, "falling back to default parameters");
                Params::default()
            }
        },
        None => Params::default(),
    };
    if cli.seed.is_some() {
        params.rng_seed = cli.seed;
    }
    params
}

fn window_conf() -> Conf {
    let params = Params::default();
    Conf {
        window_title: "Predators and Prey".to_owned(),
        window_width: params.world_width as i32,
        window_height: params.world_height as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let params = load_params(&cli);

    let mut ecosystem: Option<Ecosystem> = None;
    let mut running = true;

    loop {
        match ecosystem.as_mut() {
            None => {
                graphics::draw_genesis_screen();
                if is_key_pressed(KeyCode::Enter) {
                    match Ecosystem::new(params.clone()) {
                        Ok(eco) => {
                            info!(?params, "starting simulation");
                            ecosystem = Some(eco);
                        }
                        Err(err) => error!(%err, "cannot start simulation"),
                    }
                }
            }
            Some(eco) => {
                if is_key_pressed(KeyCode::Space) {
                    running = !running;
                }

                if running && eco.fault().is_none() {
                    // the error is latched and logged by the ecosystem
                    let _ = eco.step();
                }

                clear_background(BLACK);
                graphics::draw_sprites(&eco.sprites(), &eco.params);
                graphics::draw_census(&eco.census(), running, eco.fault());
            }
        }

        next_frame().await;
    }
}
