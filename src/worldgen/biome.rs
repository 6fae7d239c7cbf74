//! Biome classification from normalized height/temperature/moisture.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    Beach,
    Desert,
    Swamp,
    Grassland,
    Forest,
    Snow,
    Taiga,
    Tundra,
}

impl Biome {
    pub fn is_water(self) -> bool {
        self == Biome::Ocean
    }
}

/// Pure threshold table over [0,1]^3. Total: every input combination maps
/// to exactly one biome.
pub fn classify(height: f32, temperature: f32, moisture: f32, sea_level: f32) -> Biome {
    if height < sea_level {
        Biome::Ocean
    } else if height < sea_level + 0.05 {
        Biome::Beach
    } else if temperature > 0.7 {
        if moisture < 0.3 {
            Biome::Desert
        } else if moisture > 0.7 {
            Biome::Swamp
        } else {
            Biome::Grassland
        }
    } else if temperature > 0.4 {
        if moisture < 0.3 {
            Biome::Grassland
        } else {
            Biome::Forest
        }
    } else if height > 0.8 {
        Biome::Snow
    } else if moisture > 0.5 {
        Biome::Taiga
    } else {
        Biome::Tundra
    }
}
