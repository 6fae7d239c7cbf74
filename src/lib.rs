pub mod engine;
pub mod error;
pub mod grid;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod systems;
pub mod world;
pub mod worldgen;

pub use engine::{Engine, EngineBuilder, EngineSettings, System, SystemContext};
pub use error::SimError;
pub use grid::{TileGrid, TilePos};
pub use scenario::{Scenario, ScenarioLoader};
pub use snapshot::{SnapshotWriter, WorldSnapshot};
pub use world::{City, CivId, Civilization, Relation, World};
pub use worldgen::{Biome, WorldMap};
