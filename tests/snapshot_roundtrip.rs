use tellus::{
    engine::{EngineBuilder, EngineSettings},
    scenario::Scenario,
    snapshot::{SnapshotWriter, WorldSnapshot},
    systems::{DiplomacySystem, ExpansionSystem, SettlementSystem},
};

fn small_scenario() -> Scenario {
    serde_yaml::from_str(
        r#"
name: roundtrip
seed: 31337
map:
  width: 32
  height: 24
  scale: 10.0
civs:
  count: 5
"#,
    )
    .unwrap()
}

fn engine_for(scenario: &Scenario, snapshot_dir: &std::path::Path) -> tellus::Engine {
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        snapshot_interval_ticks: 0,
        snapshot_dir: snapshot_dir.to_path_buf(),
    };
    EngineBuilder::new(settings)
        .with_system(ExpansionSystem::new(scenario.civs.claim_probability))
        .with_system(SettlementSystem::new(
            scenario.civs.city_spacing,
            scenario.civs.found_city_chance,
            scenario.civs.city_population,
            scenario.civs.growth_min,
            scenario.civs.growth_max,
        ))
        .with_system(DiplomacySystem::new(scenario.diplomacy.proximity_threshold))
        .build()
}

#[test]
fn snapshot_survives_write_and_load() {
    let scenario = small_scenario();
    let mut world = scenario.build_world().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut engine = engine_for(&scenario, dir.path());
    engine.run(&mut world, 24).unwrap();

    let captured = WorldSnapshot::capture(&world);
    let writer = SnapshotWriter::new(dir.path(), 0);
    let path = writer.write_snapshot(&captured, &scenario.name).unwrap();
    let loaded = WorldSnapshot::load(&path).unwrap();

    assert_eq!(loaded.biomes, captured.biomes, "biome labels must round-trip");
    assert_eq!(loaded.food, captured.food);
    assert_eq!(loaded.wood, captured.wood);
    assert_eq!(loaded.minerals, captured.minerals);
    assert_eq!(loaded.civs, captured.civs, "territories and cities must round-trip");
    assert_eq!(loaded.ownership, captured.ownership);
    assert_eq!(loaded.relations, captured.relations);
    assert_eq!(loaded, captured);
}

#[test]
fn snapshot_matches_world_contents() {
    let scenario = small_scenario();
    let world = scenario.build_world().unwrap();
    let snapshot = WorldSnapshot::capture(&world);

    assert_eq!(snapshot.width, 32);
    assert_eq!(snapshot.height, 24);
    assert_eq!(snapshot.biomes.len(), 32 * 24);
    assert_eq!(snapshot.ownership.len(), 32 * 24);
    assert_eq!(snapshot.civs.len(), 5);
    assert_eq!(snapshot.relations.len(), 10);

    for record in &snapshot.civs {
        let civ = world.civ(record.id).unwrap();
        assert_eq!(record.home, civ.home);
        assert_eq!(record.territory.len(), civ.territory.len());
        let mut sorted = record.territory.clone();
        sorted.sort();
        assert_eq!(sorted, record.territory, "territory list is sorted");
    }
}

#[test]
fn periodic_writer_honors_interval() {
    let scenario = small_scenario();
    let mut world = scenario.build_world().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let writer = SnapshotWriter::new(dir.path(), 6);
    for _ in 0..12 {
        world.advance_tick();
        writer.maybe_write(&world, "roundtrip").unwrap();
    }

    let written: Vec<_> = std::fs::read_dir(dir.path().join("roundtrip"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(written.len(), 2, "ticks 6 and 12 only");
    assert!(written.contains(&"tick_000006.json".to_string()));
    assert!(written.contains(&"tick_000012.json".to_string()));
}
