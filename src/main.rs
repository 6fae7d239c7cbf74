use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tellus::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
    systems::{DiplomacySystem, ExpansionSystem, SettlementSystem},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Procedural world generator and civilization simulator")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/verdant_expanse.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the master seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in ticks
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    let ticks = scenario.ticks(cli.ticks);
    let snapshot_interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_ticks);
    let snapshot_dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from("snapshots"));

    info!(
        scenario = %scenario.name,
        seed = scenario.seed,
        width = scenario.map.width,
        height = scenario.map.height,
        "generating world"
    );
    let mut world = scenario.build_world()?;

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        snapshot_interval_ticks: snapshot_interval,
        snapshot_dir,
    };
    let mut engine = EngineBuilder::new(settings)
        .with_system(ExpansionSystem::new(scenario.civs.claim_probability))
        .with_system(SettlementSystem::new(
            scenario.civs.city_spacing,
            scenario.civs.found_city_chance,
            scenario.civs.city_population,
            scenario.civs.growth_min,
            scenario.civs.growth_max,
        ))
        .with_system(DiplomacySystem::new(scenario.diplomacy.proximity_threshold))
        .build();

    engine.run(&mut world, ticks)?;
    let final_path = engine.write_final_snapshot(&world)?;

    let total_territory: usize = world.civs().iter().map(|c| c.territory.len()).sum();
    let total_cities: usize = world.civs().iter().map(|c| c.cities.len()).sum();
    println!(
        "Scenario '{}' completed after {} ticks: {} civs, {} tiles claimed, {} cities. Snapshot: {}",
        scenario.name,
        ticks,
        world.civs().len(),
        total_territory,
        total_cities,
        final_path.display()
    );
    Ok(())
}
