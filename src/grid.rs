//! Tile-grid geometry: positions, index math, adjacency.

use serde::{Deserialize, Serialize};

/// Tile position in the grid
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TilePos {
    pub x: u32,
    pub y: u32,
}

impl TilePos {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position
    pub fn manhattan(self, other: TilePos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Dimensions and index math for a rectangular tile grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
}

impl TileGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Row-major offset of a position, `None` when out of bounds
    pub fn index_of(&self, pos: TilePos) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    pub fn pos_of(&self, index: usize) -> Option<TilePos> {
        if index < self.tile_count() {
            Some(TilePos {
                x: (index % self.width as usize) as u32,
                y: (index / self.width as usize) as u32,
            })
        } else {
            None
        }
    }

    /// In-bounds orthogonal neighbors (4-connectivity)
    pub fn neighbors(&self, pos: TilePos) -> Vec<TilePos> {
        let mut neighbors = Vec::with_capacity(4);
        if pos.y > 0 {
            neighbors.push(TilePos::new(pos.x, pos.y - 1));
        }
        if pos.y + 1 < self.height {
            neighbors.push(TilePos::new(pos.x, pos.y + 1));
        }
        if pos.x > 0 {
            neighbors.push(TilePos::new(pos.x - 1, pos.y));
        }
        if pos.x + 1 < self.width {
            neighbors.push(TilePos::new(pos.x + 1, pos.y));
        }
        neighbors
    }
}
