use thiserror::Error;

use crate::grid::TilePos;
use crate::world::CivId;

#[derive(Debug, Error)]
pub enum SimError {
    /// Rejection sampling ran out of attempts while placing civilizations.
    #[error("no free non-ocean spawn tile found after {attempts} attempts")]
    SpawnExhausted { attempts: u32 },

    /// A tile ended up claimed by two civilizations. This is a tie-break
    /// bug, not a recoverable condition; the run must stop.
    #[error("tile ({tile_x}, {tile_y}) owned by both civ {first} and civ {second}")]
    OwnershipConflict {
        tile_x: u32,
        tile_y: u32,
        first: CivId,
        second: CivId,
    },

    /// Ownership grid and a civilization's territory set disagree.
    #[error("civ {civ} territory and ownership grid disagree at ({tile_x}, {tile_y})")]
    TerritoryMismatch { civ: CivId, tile_x: u32, tile_y: u32 },
}

impl SimError {
    pub fn conflict(tile: TilePos, first: CivId, second: CivId) -> Self {
        SimError::OwnershipConflict {
            tile_x: tile.x,
            tile_y: tile.y,
            first,
            second,
        }
    }

    pub fn mismatch(civ: CivId, tile: TilePos) -> Self {
        SimError::TerritoryMismatch {
            civ,
            tile_x: tile.x,
            tile_y: tile.y,
        }
    }
}
