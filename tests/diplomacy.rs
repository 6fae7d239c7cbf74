use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tellus::{
    engine::{EngineBuilder, EngineSettings},
    grid::TilePos,
    systems::{advance_relation, DiplomacySystem},
    world::{Relation, World},
    worldgen::{FractalParams, MapParams, WorldMap},
};

fn land_world(width: u32, height: u32) -> World {
    let map = WorldMap::generate(
        &MapParams {
            width,
            height,
            scale: 8.0,
            fractal: FractalParams::default(),
            sea_level: 0.0,
        },
        404,
    );
    World::new(map)
}

fn diplomacy_engine(seed: u64, threshold: u32) -> tellus::Engine {
    let settings = EngineSettings {
        scenario_name: "diplomacy_tests".into(),
        seed,
        snapshot_interval_ticks: 0,
        snapshot_dir: std::path::PathBuf::from("snapshots_diplomacy_tests"),
    };
    EngineBuilder::new(settings)
        .with_system(DiplomacySystem::new(threshold))
        .build()
}

#[test]
fn close_neutral_exit_rate_matches_five_percent() {
    // 10,000 independent trials of the close-regime Neutral rule: expect
    // ~500 exits. Binomial sd is ~22, so 400..600 is a >4-sigma corridor.
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let mut exits = 0;
    for _ in 0..10_000 {
        if advance_relation(Relation::Neutral, true, &mut rng) != Relation::Neutral {
            exits += 1;
        }
    }
    assert!(
        (400..=600).contains(&exits),
        "expected ~500 exits from Neutral, got {exits}"
    );
}

#[test]
fn far_pair_only_moves_between_neutral_and_truce() {
    // Homes 59 apart: the far regime with the default threshold of 50.
    let mut world = land_world(60, 2);
    world.spawn_civ_at(TilePos::new(0, 0), 500).unwrap();
    world.spawn_civ_at(TilePos::new(59, 0), 500).unwrap();

    let mut engine = diplomacy_engine(9, 50);
    let mut seen_truce = false;
    for _ in 0..2000 {
        engine.run(&mut world, 1).unwrap();
        match world.diplomacy().get(0, 1).unwrap() {
            Relation::Neutral => {}
            Relation::Truce => seen_truce = true,
            other => panic!("far pair reached {other:?}"),
        }
    }
    assert!(seen_truce, "a 1% rule should fire within 2000 ticks");
}

#[test]
fn close_pair_reaches_alliance_or_war_before_truce() {
    let mut world = land_world(20, 20);
    world.spawn_civ_at(TilePos::new(0, 0), 500).unwrap();
    world.spawn_civ_at(TilePos::new(9, 9), 500).unwrap();

    let mut engine = diplomacy_engine(4, 50);
    let mut previous = Relation::Neutral;
    for _ in 0..2000 {
        engine.run(&mut world, 1).unwrap();
        let current = world.diplomacy().get(0, 1).unwrap();
        if current == Relation::Truce {
            assert_eq!(
                previous,
                Relation::AtWar,
                "a close pair can only reach Truce out of a war"
            );
            // Truce is terminal in the close regime; nothing more to observe.
            break;
        }
        previous = current;
    }
}

#[test]
fn close_truce_is_a_terminal_no_op() {
    let mut world = land_world(20, 20);
    world.spawn_civ_at(TilePos::new(0, 0), 500).unwrap();
    world.spawn_civ_at(TilePos::new(5, 5), 500).unwrap();
    world.diplomacy_mut().set(0, 1, Relation::Truce);

    let mut engine = diplomacy_engine(11, 50);
    engine.run(&mut world, 500).unwrap();
    assert_eq!(
        world.diplomacy().get(0, 1),
        Some(Relation::Truce),
        "no rule advances a close truce"
    );
}

#[test]
fn far_war_is_frozen() {
    let mut world = land_world(60, 2);
    world.spawn_civ_at(TilePos::new(0, 0), 500).unwrap();
    world.spawn_civ_at(TilePos::new(59, 0), 500).unwrap();
    world.diplomacy_mut().set(0, 1, Relation::AtWar);

    let mut engine = diplomacy_engine(13, 50);
    engine.run(&mut world, 500).unwrap();
    assert_eq!(world.diplomacy().get(0, 1), Some(Relation::AtWar));
}
