use anyhow::{Context, Result, ensure};
use clap::Parser;
use delve_core::{EntityKind, FloorPlan, FloorPlanConfig};
use log::debug;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

/// Generate many floor plans and check that every one of them is playable.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
}

fn check_plan(plan: &FloorPlan) -> Result<()> {
    let start = plan.starting_map().context("starting map missing from plan")?;
    let players = start.find_kind(EntityKind::Player).len();
    ensure!(players == 1, "starting map has {players} players");

    for name in plan.names() {
        let map = plan.map(name).context("named map missing from plan")?;

        for (point, portal) in map.portals() {
            let destination = portal.destination().unwrap_or_default();
            ensure!(
                plan.map(destination).is_some(),
                "{name}: portal at {point} leads to unknown map {destination:?}"
            );
        }

        for point in map.bounds().iter_points() {
            let has_architecture = map.tile(point).is_some_and(|tile| tile.architecture.is_some());
            ensure!(has_architecture, "{name}: tile {point} has no architecture");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Starting soak on seed {} for {} runs...", args.seed, args.runs);
    let config = FloorPlanConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for run in 0..args.runs {
        let run_seed = rng.next_u64();
        debug!("run {run} with seed {run_seed}");
        let plan = FloorPlan::generate(&config, run_seed)
            .with_context(|| format!("run {run} (seed {run_seed}) failed to generate"))?;
        check_plan(&plan)
            .with_context(|| format!("run {run} (seed {run_seed}) broke an invariant"))?;
    }

    println!("Soak completed successfully.");
    Ok(())
}
