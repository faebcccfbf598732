//! Command-line driver for the infection simulation.

mod report;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use plague_core::SimulationConfig;
use plague_world::Simulation;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Run an infection simulation on a 2D grid and report population counts
#[derive(Debug, Parser)]
#[command(name = "plague", version, about)]
struct Args {
    /// JSON simulation config; defaults are used when absent
    #[arg(env = "PLAGUE_CONFIG")]
    config: Option<PathBuf>,

    /// Where to write the JSON report
    report: Option<PathBuf>,

    /// Print a text frame after every generation
    #[arg(long, env = "PLAGUE_RENDER")]
    render: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    telemetry::init_telemetry()?;

    // Load configuration
    let config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    let delay = Duration::from_millis(config.generation_delay_ms);

    info!(
        "Starting Plague-Grid: {}x{} grid, {} healthy, {} infected",
        config.grid.width, config.grid.height, config.population.healthy, config.population.infected
    );

    let mut simulation = Simulation::new(config)?;
    info!(run_id = %simulation.run_id(), seed = simulation.seed(), "Simulation ready");
    if args.render {
        println!("generation 0");
        print!("{}", simulation.grid());
    }

    let result = simulation.run_with(|grid, stats| {
        if args.render {
            println!("generation {}", stats.generation);
            print!("{}", grid);
        }
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    })?;

    print!("{}", report::render_table(&result));

    if let Some(path) = &args.report {
        report::write_report(path, &result)?;
    }

    Ok(())
}
