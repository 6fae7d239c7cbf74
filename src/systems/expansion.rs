//! Territory expansion: probabilistic frontier claims, committed once per
//! tick with a deterministic tie-break.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    grid::TilePos,
    rng::{RngExt, SystemRng},
    world::{CivId, World},
};

pub struct ExpansionSystem {
    claim_probability: f64,
}

impl ExpansionSystem {
    pub fn new(claim_probability: f64) -> Self {
        Self { claim_probability }
    }
}

impl System for ExpansionSystem {
    fn name(&self) -> &str {
        "expansion"
    }

    /// Read phase: each civilization's frontier is computed against the
    /// tick-start ownership grid, and every frontier tile gets one Bernoulli
    /// draw. Commit phase: buffered claims are applied at once. When two
    /// frontiers contain the same tile, the lowest civilization id wins
    /// (civs are processed in ascending id order and the first buffered
    /// claim sticks).
    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let map = world.map();
        let grid = map.grid();
        let mut claims: BTreeMap<TilePos, CivId> = BTreeMap::new();

        for civ in &world.civs {
            let mut frontier: BTreeSet<TilePos> = BTreeSet::new();
            for &tile in &civ.territory {
                for neighbor in grid.neighbors(tile) {
                    if world.ownership.owner(neighbor).is_none() && !map.is_ocean(neighbor) {
                        frontier.insert(neighbor);
                    }
                }
            }
            for tile in frontier {
                if rng.chance(self.claim_probability) {
                    claims.entry(tile).or_insert(civ.id);
                }
            }
        }

        for (tile, civ_id) in claims {
            world.ownership.claim(tile, civ_id)?;
            world.civs[civ_id as usize].territory.insert(tile);
        }
        Ok(())
    }
}
