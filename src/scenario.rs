//! Scenario files: YAML descriptions of a world and its simulation tunables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::error::SimError;
use crate::world::World;
use crate::worldgen::{FractalParams, MapParams, WorldMap};

fn default_snapshot_interval_ticks() -> u64 {
    120
}

fn default_scale() -> f64 {
    20.0
}

fn default_octaves() -> u32 {
    6
}

fn default_persistence() -> f64 {
    0.5
}

fn default_lacunarity() -> f64 {
    2.0
}

fn default_sea_level() -> f32 {
    0.4
}

fn default_civ_count() -> u32 {
    15
}

fn default_capital_population() -> u64 {
    500
}

fn default_city_population() -> u64 {
    200
}

fn default_city_spacing() -> usize {
    20
}

fn default_found_city_chance() -> f64 {
    0.1
}

fn default_claim_probability() -> f64 {
    0.2
}

fn default_growth_min() -> f64 {
    1.01
}

fn default_growth_max() -> f64 {
    1.05
}

fn default_spawn_attempts() -> u32 {
    1000
}

fn default_proximity_threshold() -> u32 {
    50
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
    pub map: MapConfig,
    #[serde(default)]
    pub civs: CivConfig,
    #[serde(default)]
    pub diplomacy: DiplomacyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f64,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f64,
    #[serde(default = "default_sea_level")]
    pub sea_level: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CivConfig {
    #[serde(default = "default_civ_count")]
    pub count: u32,
    #[serde(default = "default_capital_population")]
    pub capital_population: u64,
    #[serde(default = "default_city_population")]
    pub city_population: u64,
    #[serde(default = "default_city_spacing")]
    pub city_spacing: usize,
    #[serde(default = "default_found_city_chance")]
    pub found_city_chance: f64,
    #[serde(default = "default_claim_probability")]
    pub claim_probability: f64,
    #[serde(default = "default_growth_min")]
    pub growth_min: f64,
    #[serde(default = "default_growth_max")]
    pub growth_max: f64,
    #[serde(default = "default_spawn_attempts")]
    pub spawn_attempts: u32,
}

impl Default for CivConfig {
    fn default() -> Self {
        Self {
            count: default_civ_count(),
            capital_population: default_capital_population(),
            city_population: default_city_population(),
            city_spacing: default_city_spacing(),
            found_city_chance: default_found_city_chance(),
            claim_probability: default_claim_probability(),
            growth_min: default_growth_min(),
            growth_max: default_growth_max(),
            spawn_attempts: default_spawn_attempts(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiplomacyConfig {
    #[serde(default = "default_proximity_threshold")]
    pub proximity_threshold: u32,
}

impl Default for DiplomacyConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: default_proximity_threshold(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn map_params(&self) -> MapParams {
        MapParams {
            width: self.map.width,
            height: self.map.height,
            scale: self.map.scale,
            fractal: FractalParams {
                octaves: self.map.octaves,
                persistence: self.map.persistence,
                lacunarity: self.map.lacunarity,
            },
            sea_level: self.map.sea_level,
        }
    }

    /// Noise seed derived from the full master seed. XOR-folding the halves
    /// keeps seeds that differ only in their high bits from producing the
    /// same map.
    pub fn map_seed(&self) -> u32 {
        (self.seed ^ (self.seed >> 32)) as u32
    }

    /// Generate the map and spawn the configured civilizations.
    pub fn build_world(&self) -> Result<World, SimError> {
        let map = WorldMap::generate(&self.map_params(), self.map_seed());
        let mut world = World::new(map);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        world.spawn_civs(
            self.civs.count,
            self.civs.capital_population,
            self.civs.spawn_attempts,
            &mut rng,
        )?;
        Ok(world)
    }

    /// 30 years of monthly ticks unless the scenario or CLI says otherwise.
    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(360)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_scenario_gets_defaults() {
        let yaml = r#"
name: test
seed: 9
map:
  width: 16
  height: 12
"#;
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.civs.count, 15);
        assert_eq!(scenario.civs.capital_population, 500);
        assert_eq!(scenario.civs.claim_probability, 0.2);
        assert_eq!(scenario.diplomacy.proximity_threshold, 50);
        assert_eq!(scenario.map.sea_level, 0.4);
        assert_eq!(scenario.ticks(None), 360);
        assert_eq!(scenario.ticks(Some(5)), 5);
    }

    #[test]
    fn high_seed_bits_change_the_map() {
        let yaml = r#"
name: test
seed: 5
map:
  width: 24
  height: 24
  sea_level: 0.0
civs:
  count: 3
"#;
        let low: Scenario = serde_yaml::from_str(yaml).unwrap();
        let mut high = low.clone();
        high.seed = 5 + (1u64 << 32);

        assert_ne!(low.map_seed(), high.map_seed());
        let world_low = low.build_world().unwrap();
        let world_high = high.build_world().unwrap();
        assert_ne!(
            world_low.map().biomes(),
            world_high.map().biomes(),
            "seeds differing only in high bits must not share a map"
        );
    }

    #[test]
    fn build_world_spawns_configured_civs() {
        let yaml = r#"
name: test
seed: 12
map:
  width: 24
  height: 24
  sea_level: 0.0
civs:
  count: 4
"#;
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        let world = scenario.build_world().unwrap();
        assert_eq!(world.civs().len(), 4);
        assert_eq!(world.diplomacy().len(), 6);
    }
}
