//! Diplomacy: a per-pair state machine advanced by proximity-gated chance.

use anyhow::Result;
use rand::Rng;

use crate::{
    engine::{System, SystemContext},
    rng::{RngExt, SystemRng},
    world::{CivId, Relation, World},
};

/// Close pairs: chance per tick that a Neutral pair picks a side
pub const CLOSE_EVENT_CHANCE: f64 = 0.05;
/// Close pairs: chance an alliance lapses back to Neutral
pub const ALLIANCE_DECAY_CHANCE: f64 = 0.02;
/// Close pairs: chance a war settles into Truce
pub const TRUCE_CHANCE: f64 = 0.01;
/// Far pairs: chance a Neutral pair drifts into Truce
pub const FAR_TRUCE_CHANCE: f64 = 0.01;
/// Far pairs: chance a Truce relaxes back to Neutral
pub const FAR_NEUTRAL_CHANCE: f64 = 0.005;

/// One step of the relation state machine. No rule advances a close Truce
/// or a far Allied/AtWar pair; those are deliberate no-ops, not gaps.
pub fn advance_relation(current: Relation, close: bool, rng: &mut impl Rng) -> Relation {
    if close {
        match current {
            Relation::Neutral => {
                if rng.chance(CLOSE_EVENT_CHANCE) {
                    if rng.gen() {
                        Relation::Allied
                    } else {
                        Relation::AtWar
                    }
                } else {
                    current
                }
            }
            Relation::Allied => {
                if rng.chance(ALLIANCE_DECAY_CHANCE) {
                    Relation::Neutral
                } else {
                    current
                }
            }
            Relation::AtWar => {
                if rng.chance(TRUCE_CHANCE) {
                    Relation::Truce
                } else {
                    current
                }
            }
            Relation::Truce => current,
        }
    } else {
        match current {
            Relation::Neutral => {
                if rng.chance(FAR_TRUCE_CHANCE) {
                    Relation::Truce
                } else {
                    current
                }
            }
            Relation::Truce => {
                if rng.chance(FAR_NEUTRAL_CHANCE) {
                    Relation::Neutral
                } else {
                    current
                }
            }
            Relation::Allied | Relation::AtWar => current,
        }
    }
}

pub struct DiplomacySystem {
    /// Manhattan distance between homes below which a pair counts as close
    proximity_threshold: u32,
}

impl DiplomacySystem {
    pub fn new(proximity_threshold: u32) -> Self {
        Self { proximity_threshold }
    }
}

impl System for DiplomacySystem {
    fn name(&self) -> &str {
        "diplomacy"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let pairs: Vec<(CivId, CivId, Relation)> = world
            .diplomacy
            .pairs()
            .map(|((a, b), relation)| (a, b, relation))
            .collect();

        for (a, b, current) in pairs {
            let home_a = world.civs[a as usize].home;
            let home_b = world.civs[b as usize].home;
            let close = home_a.manhattan(home_b) < self.proximity_threshold;
            let next = advance_relation(current, close, rng);
            if next != current {
                world.diplomacy.set(a, b, next);
            }
        }
        Ok(())
    }
}
