//! Fixed-size tile grid
//!
//! Tiles live in a flat arena indexed by `y * width + x`. The grid starts
//! fully wall-filled, so anything never carved stays solid.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::tile::{DoorState, Tile, TileKind};
use crate::error::{EngineError, Result};

/// Rectangular array of tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a wall-filled grid
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::invalid(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        if width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(EngineError::invalid("grid dimensions exceed i32 range"));
        }
        Ok(Self {
            width,
            height,
            tiles: vec![Tile::wall(); width * height],
        })
    }

    pub(crate) fn from_tiles(width: usize, height: usize, tiles: Vec<Tile>) -> Result<Self> {
        let mut grid = Self::new(width, height)?;
        if tiles.len() != width * height {
            return Err(EngineError::invalid(format!(
                "expected {} tiles for {width}x{height}, got {}",
                width * height,
                tiles.len()
            )));
        }
        grid.tiles = tiles;
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Check if a coordinate lies inside the grid
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Flat arena index of a coordinate
    pub fn index(&self, x: i32, y: i32) -> Result<usize> {
        if !self.in_bounds(x, y) {
            return Err(EngineError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width + x as usize)
    }

    /// Coordinate of a flat arena index
    pub fn coord(&self, index: usize) -> (i32, i32) {
        ((index % self.width) as i32, (index / self.width) as i32)
    }

    /// Get the tile at a coordinate
    pub fn get(&self, x: i32, y: i32) -> Result<Tile> {
        Ok(self.tiles[self.index(x, y)?])
    }

    /// Set the kind of a tile, resetting any door state
    pub fn set_kind(&mut self, x: i32, y: i32, kind: TileKind) -> Result<()> {
        let idx = self.index(x, y)?;
        self.tiles[idx] = Tile::new(kind);
        Ok(())
    }

    /// Replace a tile with a door in the given state
    pub fn set_door(&mut self, x: i32, y: i32, state: DoorState) -> Result<()> {
        let idx = self.index(x, y)?;
        self.tiles[idx] = Tile::door(state);
        Ok(())
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> Result<bool> {
        Ok(self.get(x, y)?.is_walkable())
    }

    pub fn is_opaque(&self, x: i32, y: i32) -> Result<bool> {
        Ok(self.get(x, y)?.is_opaque())
    }

    /// Write `kind` over every cell of `rect`
    pub fn fill_rect(&mut self, rect: &Rect, kind: TileKind) -> Result<()> {
        if rect.right() > self.width || rect.bottom() > self.height {
            return Err(EngineError::OutOfBounds {
                x: rect.right() as i32 - 1,
                y: rect.bottom() as i32 - 1,
                width: self.width,
                height: self.height,
            });
        }
        for (x, y) in rect.cells() {
            self.tiles[y * self.width + x] = Tile::new(kind);
        }
        Ok(())
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Walkable orthogonal neighbours of an in-bounds cell
    pub(crate) fn walkable_neighbors(
        &self,
        x: i32,
        y: i32,
    ) -> impl Iterator<Item = (i32, i32)> + '_ {
        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .map(move |(dx, dy)| (x + dx, y + dy))
            .filter(|&(nx, ny)| {
                self.in_bounds(nx, ny)
                    && self.tiles[ny as usize * self.width + nx as usize].is_walkable()
            })
    }

    /// Count tiles of a given kind
    pub fn count_kind(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| t.kind == kind).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.width) {
            for tile in row {
                write!(f, "{}", tile.kind.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
