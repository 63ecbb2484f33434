//! Walkable-path distances over the grid
//!
//! Breadth-first flood fill over 4-connected walkable tiles. Used for the
//! connectivity check, exit placement and path-length queries.

use std::collections::VecDeque;

use super::grid::Grid;
use crate::error::Result;

/// Step counts from a start cell to every reachable cell
#[derive(Debug, Clone)]
pub struct DistanceMap {
    width: usize,
    height: usize,
    dist: Vec<Option<u32>>,
}

impl DistanceMap {
    /// Flood fill from `start`; the start cell itself need not be walkable
    pub fn from_start(grid: &Grid, start: (i32, i32)) -> Result<Self> {
        let start_idx = grid.index(start.0, start.1)?;
        let mut dist = vec![None; grid.len()];
        dist[start_idx] = Some(0);

        let mut queue = VecDeque::from([start]);
        while let Some((x, y)) = queue.pop_front() {
            let d = dist[y as usize * grid.width() + x as usize].unwrap_or(0);
            for (nx, ny) in grid.walkable_neighbors(x, y) {
                let idx = ny as usize * grid.width() + nx as usize;
                if dist[idx].is_none() {
                    dist[idx] = Some(d + 1);
                    queue.push_back((nx, ny));
                }
            }
        }

        Ok(Self {
            width: grid.width(),
            height: grid.height(),
            dist,
        })
    }

    /// Path length to a cell, None if unreachable or out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.dist[y as usize * self.width + x as usize]
    }

    pub fn reached(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some()
    }

    /// Number of reachable cells, start included
    pub fn reached_count(&self) -> usize {
        self.dist.iter().filter(|d| d.is_some()).count()
    }

    /// Farthest reachable cell and its distance
    pub fn farthest(&self) -> Option<((i32, i32), u32)> {
        self.dist
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.map(|d| (i, d)))
            .max_by_key(|&(i, d)| (d, core::cmp::Reverse(i)))
            .map(|(i, d)| (((i % self.width) as i32, (i / self.width) as i32), d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::rect::Rect;
    use crate::dungeon::tile::{DoorState, TileKind};

    fn corridor_grid() -> Grid {
        // #######
        // #.....#
        // ###.###
        // #.....#
        // #######
        let mut grid = Grid::new(7, 5).unwrap();
        grid.fill_rect(&Rect::new(1, 1, 5, 1), TileKind::Floor).unwrap();
        grid.fill_rect(&Rect::new(1, 3, 5, 1), TileKind::Floor).unwrap();
        grid.set_kind(3, 2, TileKind::Floor).unwrap();
        grid
    }

    #[test]
    fn test_distances() {
        let grid = corridor_grid();
        let map = DistanceMap::from_start(&grid, (1, 1)).unwrap();
        assert_eq!(map.get(1, 1), Some(0));
        assert_eq!(map.get(3, 1), Some(2));
        assert_eq!(map.get(3, 3), Some(4));
        assert_eq!(map.get(1, 3), Some(6));
        assert_eq!(map.get(0, 0), None);
        assert_eq!(map.get(-1, 0), None);
        assert_eq!(map.reached_count(), 11);
    }

    #[test]
    fn test_closed_door_blocks() {
        let mut grid = corridor_grid();
        grid.set_door(3, 2, DoorState::CLOSED).unwrap();
        let map = DistanceMap::from_start(&grid, (1, 1)).unwrap();
        assert!(!map.reached(3, 3));

        grid.set_door(3, 2, DoorState::OPEN).unwrap();
        let map = DistanceMap::from_start(&grid, (1, 1)).unwrap();
        assert!(map.reached(3, 3));
    }

    #[test]
    fn test_farthest() {
        let grid = corridor_grid();
        let map = DistanceMap::from_start(&grid, (1, 1)).unwrap();
        // (1,3) and (5,3) are both 6 steps away; the lower index wins
        assert_eq!(map.farthest(), Some(((1, 3), 6)));
    }

    #[test]
    fn test_start_out_of_bounds() {
        let grid = corridor_grid();
        assert!(DistanceMap::from_start(&grid, (7, 0)).is_err());
    }
}
