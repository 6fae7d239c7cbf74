//! World snapshot export/import.
//!
//! The snapshot is the run's output artifact: everything needed to render
//! or analyze the world, as plain data that round-trips through JSON
//! without loss.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::TilePos;
use crate::world::{City, CivId, Relation, World};
use crate::worldgen::Biome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CivRecord {
    pub id: CivId,
    pub home: TilePos,
    /// Sorted coordinate list (territory sets iterate in order)
    pub territory: Vec<TilePos>,
    pub cities: Vec<City>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationRecord {
    pub a: CivId,
    pub b: CivId,
    pub state: Relation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub generated_at: String,
    pub tick: u64,
    pub width: u32,
    pub height: u32,
    pub biomes: Vec<Biome>,
    pub food: Vec<f32>,
    pub wood: Vec<f32>,
    pub minerals: Vec<f32>,
    pub civs: Vec<CivRecord>,
    pub ownership: Vec<Option<CivId>>,
    pub relations: Vec<RelationRecord>,
}

impl WorldSnapshot {
    pub fn capture(world: &World) -> Self {
        let map = world.map();
        let grid = map.grid();
        let civs = world
            .civs()
            .iter()
            .map(|civ| CivRecord {
                id: civ.id,
                home: civ.home,
                territory: civ.territory.iter().copied().collect(),
                cities: civ.cities.clone(),
            })
            .collect();
        let relations = world
            .diplomacy()
            .pairs()
            .map(|((a, b), state)| RelationRecord { a, b, state })
            .collect();
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            tick: world.tick(),
            width: grid.width(),
            height: grid.height(),
            biomes: map.biomes().to_vec(),
            food: map.food_potential().to_vec(),
            wood: map.wood_potential().to_vec(),
            minerals: map.mineral_potential().to_vec(),
            civs,
            ownership: world.ownership().cells().to_vec(),
            relations,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot: WorldSnapshot = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
        Ok(snapshot)
    }
}

/// Writes snapshots under `<dir>/<scenario>/tick_NNNNNN.json` every
/// `interval` ticks; an interval of zero disables periodic writes.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval,
        }
    }

    pub fn maybe_write(&self, world: &World, scenario: &str) -> Result<Option<PathBuf>> {
        if self.interval == 0 || world.tick() % self.interval != 0 {
            return Ok(None);
        }
        self.write(world, scenario).map(Some)
    }

    pub fn write(&self, world: &World, scenario: &str) -> Result<PathBuf> {
        self.write_snapshot(&WorldSnapshot::capture(world), scenario)
    }

    /// Write an already-captured snapshot, so the caller's copy and the file
    /// contents are byte-for-byte the same data.
    pub fn write_snapshot(&self, snapshot: &WorldSnapshot, scenario: &str) -> Result<PathBuf> {
        let dir = self.dir.join(scenario);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("tick_{:06}.json", snapshot.tick));
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        debug!(path = %path.display(), tick = snapshot.tick, "snapshot written");
        Ok(path)
    }
}
