//! Fractal noise field synthesis.
//!
//! Sums several octaves of Perlin noise per tile and min-max normalizes the
//! whole field to [0, 1]. Output is fully determined by the seed, so world
//! generation is reproducible.

use noise::{NoiseFn, Perlin, Seedable};

use crate::grid::{TileGrid, TilePos};

/// Fractal (fBm) synthesis parameters
#[derive(Debug, Clone, Copy)]
pub struct FractalParams {
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Dense per-tile scalar field, normalized to [0, 1]
#[derive(Debug, Clone)]
pub struct NoiseField {
    grid: TileGrid,
    values: Vec<f32>,
}

impl NoiseField {
    /// Generate a field over `grid`. `scale` is in tiles per noise unit:
    /// larger scales give broader features.
    pub fn generate(grid: TileGrid, scale: f64, seed: u32, params: &FractalParams) -> Self {
        let sampler = Perlin::new(1).set_seed(seed);
        let mut raw = vec![0.0f64; grid.tile_count()];

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let mut amplitude = 1.0;
                let mut frequency = 1.0;
                let mut total = 0.0;
                for _ in 0..params.octaves {
                    let nx = x as f64 / scale * frequency;
                    let ny = y as f64 / scale * frequency;
                    total += sampler.get([nx, ny]) * amplitude;
                    amplitude *= params.persistence;
                    frequency *= params.lacunarity;
                }
                let index = y as usize * grid.width() as usize + x as usize;
                raw[index] = total;
            }
        }

        Self {
            grid,
            values: normalize(&raw),
        }
    }

    pub fn grid(&self) -> TileGrid {
        self.grid
    }

    pub fn get(&self, pos: TilePos) -> f32 {
        let index = self
            .grid
            .index_of(pos)
            .unwrap_or_else(|| panic!("position ({}, {}) outside field", pos.x, pos.y));
        self.values[index]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Scale every row by `1 - |2*(y/height) - 1|`, so the poles trend
    /// toward zero and the equator keeps its value. Used for temperature.
    pub fn attenuate_by_latitude(&mut self) {
        let height = self.grid.height() as f64;
        let width = self.grid.width() as usize;
        for y in 0..self.grid.height() {
            let lat_factor = 1.0 - ((y as f64 / height) * 2.0 - 1.0).abs();
            let row = y as usize * width;
            for value in &mut self.values[row..row + width] {
                *value = (*value as f64 * lat_factor) as f32;
            }
        }
    }
}

/// Min-max rescale to [0, 1]; a constant field becomes all 0.5 rather than
/// dividing by zero.
fn normalize(raw: &[f64]) -> Vec<f32> {
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return vec![0.5; raw.len()];
    }
    let span = max - min;
    raw.iter().map(|v| ((v - min) / span) as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_within_unit_interval() {
        let grid = TileGrid::new(32, 16);
        let field = NoiseField::generate(grid, 10.0, 1234, &FractalParams::default());
        assert!(field
            .values()
            .iter()
            .all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let grid = TileGrid::new(16, 16);
        let params = FractalParams::default();
        let a = NoiseField::generate(grid, 8.0, 99, &params);
        let b = NoiseField::generate(grid, 8.0, 99, &params);
        assert_eq!(a.values(), b.values());
        let c = NoiseField::generate(grid, 8.0, 100, &params);
        assert_ne!(a.values(), c.values(), "different seeds should differ");
    }

    #[test]
    fn constant_field_becomes_half() {
        // Zero octaves accumulate nothing, so the raw field is constant.
        let grid = TileGrid::new(8, 8);
        let params = FractalParams {
            octaves: 0,
            ..FractalParams::default()
        };
        let field = NoiseField::generate(grid, 10.0, 5, &params);
        assert!(field.values().iter().all(|v| *v == 0.5));
    }

    #[test]
    fn latitude_attenuation_zeroes_top_row() {
        let grid = TileGrid::new(4, 9);
        let mut field = NoiseField::generate(grid, 5.0, 77, &FractalParams::default());
        field.attenuate_by_latitude();
        for x in 0..4 {
            assert_eq!(field.get(TilePos::new(x, 0)), 0.0);
        }
        // attenuation only scales down, so values stay normalized
        assert!(field.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
