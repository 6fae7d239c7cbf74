//! Mutable simulation state: civilizations, tile ownership, diplomacy.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::grid::TilePos;
use crate::worldgen::WorldMap;

pub type CivId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub location: TilePos,
    pub population: u64,
}

/// One civilization: identity, owned tiles, cities. Territory only grows;
/// civilizations are never destroyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Civilization {
    pub id: CivId,
    /// Spawn tile; also the capital location and the diplomacy reference point
    pub home: TilePos,
    pub territory: BTreeSet<TilePos>,
    pub cities: Vec<City>,
}

impl Civilization {
    pub fn has_city_at(&self, pos: TilePos) -> bool {
        self.cities.iter().any(|c| c.location == pos)
    }

    pub fn total_population(&self) -> u64 {
        self.cities.iter().map(|c| c.population).sum()
    }
}

/// Global per-tile ownership record. At most one owner per tile, enforced
/// at claim time.
#[derive(Debug, Clone)]
pub struct OwnershipGrid {
    width: u32,
    cells: Vec<Option<CivId>>,
}

impl OwnershipGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            cells: vec![None; width as usize * height as usize],
        }
    }

    pub fn owner(&self, pos: TilePos) -> Option<CivId> {
        self.cells[self.index(pos)]
    }

    pub fn claim(&mut self, pos: TilePos, civ: CivId) -> Result<(), SimError> {
        let index = self.index(pos);
        match self.cells[index] {
            Some(existing) => Err(SimError::conflict(pos, existing, civ)),
            None => {
                self.cells[index] = Some(civ);
                Ok(())
            }
        }
    }

    pub fn cells(&self) -> &[Option<CivId>] {
        &self.cells
    }

    pub fn owned_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    fn index(&self, pos: TilePos) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }
}

/// Diplomatic stance of a civilization pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    Neutral,
    Allied,
    AtWar,
    Truce,
}

/// Relation per unordered civilization pair, keyed canonically (low, high).
/// Every pair exists from world start and is never removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiplomacyTable {
    relations: BTreeMap<(CivId, CivId), Relation>,
}

fn canonical(a: CivId, b: CivId) -> (CivId, CivId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl DiplomacyTable {
    pub fn get(&self, a: CivId, b: CivId) -> Option<Relation> {
        self.relations.get(&canonical(a, b)).copied()
    }

    pub fn set(&mut self, a: CivId, b: CivId, relation: Relation) {
        self.relations.insert(canonical(a, b), relation);
    }

    pub fn pairs(&self) -> impl Iterator<Item = ((CivId, CivId), Relation)> + '_ {
        self.relations.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    fn add_neutral_pairs_for(&mut self, new_civ: CivId, existing: impl Iterator<Item = CivId>) {
        for other in existing {
            self.relations.insert(canonical(other, new_civ), Relation::Neutral);
        }
    }
}

/// Full simulation state. The map is immutable; civilizations, ownership
/// and diplomacy evolve each tick.
pub struct World {
    map: WorldMap,
    pub(crate) civs: Vec<Civilization>,
    pub(crate) ownership: OwnershipGrid,
    pub(crate) diplomacy: DiplomacyTable,
    tick: u64,
}

impl World {
    pub fn new(map: WorldMap) -> Self {
        let grid = map.grid();
        Self {
            map,
            civs: Vec::new(),
            ownership: OwnershipGrid::new(grid.width(), grid.height()),
            diplomacy: DiplomacyTable::default(),
            tick: 0,
        }
    }

    /// Spawn `num_civs` civilizations on distinct non-ocean tiles by
    /// rejection sampling. Each civilization gets the spawn tile as its
    /// territory and a capital city there.
    pub fn spawn_civs(
        &mut self,
        num_civs: u32,
        capital_population: u64,
        max_attempts: u32,
        rng: &mut impl Rng,
    ) -> Result<(), SimError> {
        let grid = self.map.grid();
        for _ in 0..num_civs {
            let mut placed = None;
            for _ in 0..max_attempts {
                let pos = TilePos::new(
                    rng.gen_range(0..grid.width()),
                    rng.gen_range(0..grid.height()),
                );
                if !self.map.is_ocean(pos) && self.ownership.owner(pos).is_none() {
                    placed = Some(pos);
                    break;
                }
            }
            let pos = placed.ok_or(SimError::SpawnExhausted {
                attempts: max_attempts,
            })?;
            self.spawn_civ_at(pos, capital_population)?;
        }
        Ok(())
    }

    /// Place one civilization at an explicit tile. Used by scripted
    /// scenarios; fails if the tile is already owned.
    pub fn spawn_civ_at(
        &mut self,
        home: TilePos,
        capital_population: u64,
    ) -> Result<CivId, SimError> {
        let id = self.civs.len() as CivId;
        self.ownership.claim(home, id)?;
        self.diplomacy
            .add_neutral_pairs_for(id, self.civs.iter().map(|c| c.id));
        let mut territory = BTreeSet::new();
        territory.insert(home);
        self.civs.push(Civilization {
            id,
            home,
            territory,
            cities: vec![City {
                location: home,
                population: capital_population,
            }],
        });
        Ok(id)
    }

    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    pub fn civs(&self) -> &[Civilization] {
        &self.civs
    }

    pub fn civ(&self, id: CivId) -> Option<&Civilization> {
        self.civs.get(id as usize)
    }

    pub fn ownership(&self) -> &OwnershipGrid {
        &self.ownership
    }

    pub fn diplomacy(&self) -> &DiplomacyTable {
        &self.diplomacy
    }

    pub fn diplomacy_mut(&mut self) -> &mut DiplomacyTable {
        &mut self.diplomacy
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    /// Check the territory-set/ownership-grid bijection. A mismatch means a
    /// tie-break bug; the caller must abort the run.
    pub fn verify_ownership(&self) -> Result<(), SimError> {
        let mut claimed_total = 0usize;
        for civ in &self.civs {
            claimed_total += civ.territory.len();
            for &tile in &civ.territory {
                match self.ownership.owner(tile) {
                    Some(owner) if owner == civ.id => {}
                    Some(owner) => return Err(SimError::conflict(tile, owner, civ.id)),
                    None => return Err(SimError::mismatch(civ.id, tile)),
                }
            }
        }
        // Any grid cell owned without a matching territory entry shows up
        // as a count difference.
        let owned = self.ownership.owned_count();
        if owned != claimed_total {
            for (index, cell) in self.ownership.cells().iter().enumerate() {
                if let Some(owner) = *cell {
                    let pos = self
                        .map
                        .grid()
                        .pos_of(index)
                        .expect("ownership cell index in range");
                    let in_territory = self
                        .civ(owner)
                        .map(|c| c.territory.contains(&pos))
                        .unwrap_or(false);
                    if !in_territory {
                        return Err(SimError::mismatch(owner, pos));
                    }
                }
            }
        }
        Ok(())
    }
}
