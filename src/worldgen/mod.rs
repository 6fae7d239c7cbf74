//! World map generation: three noise fields, biome classification, and
//! derived resource potentials, assembled into the read-only substrate the
//! simulation runs on.

pub mod biome;
pub mod noise;

pub use biome::{classify, Biome};
pub use noise::{FractalParams, NoiseField};

use crate::grid::{TileGrid, TilePos};

/// Generation parameters for one map
#[derive(Debug, Clone, Copy)]
pub struct MapParams {
    pub width: u32,
    pub height: u32,
    /// Base noise scale; temperature and moisture use 2x and 1.5x of it
    pub scale: f64,
    pub fractal: FractalParams,
    pub sea_level: f32,
}

/// Per-tile resource potentials, each clamped to [0, 10]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resources {
    pub food: f32,
    pub wood: f32,
    pub minerals: f32,
}

/// Immutable world substrate. Built once; the simulation only reads it.
pub struct WorldMap {
    grid: TileGrid,
    sea_level: f32,
    height: NoiseField,
    temperature: NoiseField,
    moisture: NoiseField,
    biomes: Vec<Biome>,
    food: Vec<f32>,
    wood: Vec<f32>,
    minerals: Vec<f32>,
}

impl WorldMap {
    pub fn generate(params: &MapParams, seed: u32) -> Self {
        let grid = TileGrid::new(params.width, params.height);
        let height = NoiseField::generate(grid, params.scale, seed, &params.fractal);
        let mut temperature =
            NoiseField::generate(grid, params.scale * 2.0, seed, &params.fractal);
        let moisture =
            NoiseField::generate(grid, params.scale * 1.5, seed, &params.fractal);

        // Latitude shapes temperature before any derived data is computed.
        temperature.attenuate_by_latitude();

        let biomes = height
            .values()
            .iter()
            .zip(temperature.values())
            .zip(moisture.values())
            .map(|((&h, &t), &m)| classify(h, t, m, params.sea_level))
            .collect();

        let potential = |values: &[f32]| -> Vec<f32> {
            values.iter().map(|v| (v * 10.0).clamp(0.0, 10.0)).collect()
        };
        let food = potential(height.values());
        let wood = potential(temperature.values());
        let minerals = potential(moisture.values());

        Self {
            grid,
            sea_level: params.sea_level,
            height,
            temperature,
            moisture,
            biomes,
            food,
            wood,
            minerals,
        }
    }

    pub fn grid(&self) -> TileGrid {
        self.grid
    }

    pub fn sea_level(&self) -> f32 {
        self.sea_level
    }

    pub fn biome_at(&self, pos: TilePos) -> Biome {
        self.biomes[self.index(pos)]
    }

    pub fn is_ocean(&self, pos: TilePos) -> bool {
        self.biome_at(pos).is_water()
    }

    pub fn resources_at(&self, pos: TilePos) -> Resources {
        let index = self.index(pos);
        Resources {
            food: self.food[index],
            wood: self.wood[index],
            minerals: self.minerals[index],
        }
    }

    pub fn biomes(&self) -> &[Biome] {
        &self.biomes
    }

    pub fn height_field(&self) -> &NoiseField {
        &self.height
    }

    pub fn temperature_field(&self) -> &NoiseField {
        &self.temperature
    }

    pub fn moisture_field(&self) -> &NoiseField {
        &self.moisture
    }

    pub fn food_potential(&self) -> &[f32] {
        &self.food
    }

    pub fn wood_potential(&self) -> &[f32] {
        &self.wood
    }

    pub fn mineral_potential(&self) -> &[f32] {
        &self.minerals
    }

    fn index(&self, pos: TilePos) -> usize {
        self.grid
            .index_of(pos)
            .unwrap_or_else(|| panic!("position ({}, {}) outside map", pos.x, pos.y))
    }
}
