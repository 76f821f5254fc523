mod seed;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use delve_core::{FloorPlan, FloorPlanConfig};
use log::info;

use crate::seed::{SeedChoice, generate_runtime_seed};

/// Generate a floor plan and print one of its maps as ASCII.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run seed; a fresh one is generated when omitted
    #[arg(short, long)]
    seed: Option<u64>,
    /// Floor plan to generate (TOML, or JSON with a .json extension)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Map to print instead of the starting map
    #[arg(short, long)]
    map: Option<String>,
    /// Print the effective floor plan as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => FloorPlanConfig::load(path)
            .with_context(|| format!("Failed to load floor plan: {}", path.display()))?,
        None => FloorPlanConfig::default(),
    };

    if args.dump_config {
        print!("{}", config.to_toml_string().context("Failed to serialize floor plan")?);
        return Ok(());
    }

    let seed = SeedChoice::resolve(args.seed, generate_runtime_seed);
    info!("using {} seed {}", seed.source(), seed.value());

    let plan = FloorPlan::generate(&config, seed.value()).context("Generation failed")?;
    let name = args.map.as_deref().unwrap_or(plan.starting_map_name());
    let map = plan.map(name).ok_or_else(|| {
        let known: Vec<&str> = plan.names().collect();
        anyhow!("No map named {name}; the plan has {}", known.join(", "))
    })?;

    println!("Seed: {}", seed.value());
    println!("Map: {name} ({})", map.size());
    print!("{}", map.render());

    Ok(())
}
