//! City founding and population growth.

use anyhow::Result;
use rand::Rng;

use crate::{
    engine::{System, SystemContext},
    grid::TilePos,
    rng::{RngExt, SystemRng},
    world::{City, World},
};

pub struct SettlementSystem {
    /// Territory tiles per city before a new one may be founded
    city_spacing: usize,
    found_city_chance: f64,
    city_population: u64,
    growth_min: f64,
    growth_max: f64,
}

impl SettlementSystem {
    pub fn new(
        city_spacing: usize,
        found_city_chance: f64,
        city_population: u64,
        growth_min: f64,
        growth_max: f64,
    ) -> Self {
        Self {
            city_spacing,
            found_city_chance,
            city_population,
            growth_min,
            growth_max,
        }
    }
}

impl System for SettlementSystem {
    fn name(&self) -> &str {
        "settlement"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        for civ in &mut world.civs {
            if civ.territory.len() > civ.cities.len() * self.city_spacing
                && rng.chance(self.found_city_chance)
            {
                let open: Vec<TilePos> = civ
                    .territory
                    .iter()
                    .copied()
                    .filter(|tile| !civ.has_city_at(*tile))
                    .collect();
                if !open.is_empty() {
                    let location = open[rng.gen_range(0..open.len())];
                    civ.cities.push(City {
                        location,
                        population: self.city_population,
                    });
                }
            }

            // Compounding multiplicative growth; truncation to u64 never
            // shrinks a population.
            for city in &mut civ.cities {
                let factor = rng.factor_in(self.growth_min, self.growth_max);
                city.population = (city.population as f64 * factor) as u64;
            }
        }
        Ok(())
    }
}
