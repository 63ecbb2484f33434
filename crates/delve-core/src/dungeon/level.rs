//! A generated level and its runtime state
//!
//! Layout is fixed once generated. Door states, stairs usage and the
//! observer's exploration memory are the only things that change.

use tracing::debug;

use super::corridor::Corridor;
use super::flood::DistanceMap;
use super::generation::Layout;
use super::grid::Grid;
use super::room::{room_at, Room};
use super::tile::{DoorState, Tile, TileKind};
use crate::config::GenerationParams;
use crate::error::Result;
use crate::rng::GameRng;
use crate::vision::{self, ExplorationMap};

/// Random probes before [`Level::random_floor_position`] falls back to a scan
const FLOOR_PROBES: usize = 100;

/// A fully connected dungeon level
#[derive(Debug, Clone)]
pub struct Level {
    seed: u64,
    params: GenerationParams,
    grid: Grid,
    rooms: Vec<Room>,
    corridors: Vec<Corridor>,
    entry: (i32, i32),
    exit: (i32, i32),
    exit_used: bool,
    exploration: ExplorationMap,
}

impl Level {
    pub(crate) fn from_layout(seed: u64, params: GenerationParams, layout: Layout) -> Self {
        let exploration = ExplorationMap::new(layout.grid.width(), layout.grid.height());
        Self {
            seed,
            params,
            grid: layout.grid,
            rooms: layout.rooms,
            corridors: layout.corridors,
            entry: layout.entry,
            exit: layout.exit,
            exit_used: false,
            exploration,
        }
    }

    /// Swap in restored runtime state; shapes are checked by the caller
    pub(crate) fn restore(&mut self, grid: Grid, exploration: ExplorationMap, exit_used: bool) {
        self.grid = grid;
        self.exploration = exploration;
        self.exit_used = exit_used;
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Rooms in connection order
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    /// Up stairs, at the center of the first room
    pub fn entry(&self) -> (i32, i32) {
        self.entry
    }

    /// Down stairs
    pub fn exit(&self) -> (i32, i32) {
        self.exit
    }

    pub fn tile(&self, x: i32, y: i32) -> Result<Tile> {
        self.grid.get(x, y)
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> Result<bool> {
        self.grid.is_walkable(x, y)
    }

    pub fn is_opaque(&self, x: i32, y: i32) -> Result<bool> {
        self.grid.is_opaque(x, y)
    }

    /// Index of the room whose floor contains a cell
    pub fn room_at(&self, x: i32, y: i32) -> Option<usize> {
        room_at(&self.rooms, x, y)
    }

    /// Random plain floor cell inside a room, for spawning
    ///
    /// Never returns stairs or doors. Falls back to the first plain floor
    /// cell anywhere; None only when the level has no plain floor at all.
    pub fn random_floor_position(&self, rng: &mut GameRng) -> Option<(i32, i32)> {
        for _ in 0..FLOOR_PROBES {
            let Some(room) = rng.choose(&self.rooms) else {
                break;
            };
            let (x, y) = room.random_point(rng);
            if matches!(self.grid.get(x, y), Ok(t) if t.kind == TileKind::Floor) {
                return Some((x, y));
            }
        }
        self.grid
            .tiles()
            .iter()
            .position(|t| t.kind == TileKind::Floor)
            .map(|i| self.grid.coord(i))
    }

    /// Open a closed door; Ok(false) if there is no shut door here
    ///
    /// Locked doors stay shut.
    pub fn open_door(&mut self, x: i32, y: i32) -> Result<bool> {
        let tile = self.grid.get(x, y)?;
        if tile.kind != TileKind::Door
            || !tile.door.is_shut()
            || tile.door.contains(DoorState::LOCKED)
        {
            return Ok(false);
        }
        self.grid.set_door(x, y, DoorState::OPEN)?;
        debug!(x, y, "door opened");
        Ok(true)
    }

    /// Close an open door; Ok(false) if there is no open door here
    ///
    /// Broken doors cannot be closed.
    pub fn close_door(&mut self, x: i32, y: i32) -> Result<bool> {
        let tile = self.grid.get(x, y)?;
        if tile.kind != TileKind::Door || tile.door != DoorState::OPEN {
            return Ok(false);
        }
        self.grid.set_door(x, y, DoorState::CLOSED)?;
        debug!(x, y, "door closed");
        Ok(true)
    }

    /// Mark the down stairs as taken
    pub fn use_exit(&mut self) {
        self.exit_used = true;
    }

    pub fn exit_used(&self) -> bool {
        self.exit_used
    }

    /// Walking distance between two cells, None if unreachable
    pub fn path_distance(&self, from: (i32, i32), to: (i32, i32)) -> Result<Option<u32>> {
        self.grid.index(to.0, to.1)?;
        Ok(DistanceMap::from_start(&self.grid, from)?.get(to.0, to.1))
    }

    /// Recompute what an observer at `observer` sees
    ///
    /// On error the exploration state is unchanged.
    pub fn recompute_visibility(
        &mut self,
        observer: (i32, i32),
        radius: i32,
    ) -> Result<&ExplorationMap> {
        self.exploration.recompute(&self.grid, observer, radius)?;
        Ok(&self.exploration)
    }

    pub fn exploration(&self) -> &ExplorationMap {
        &self.exploration
    }

    pub fn is_visible(&self, x: i32, y: i32) -> Result<bool> {
        self.exploration.is_visible(x, y)
    }

    pub fn is_known(&self, x: i32, y: i32) -> Result<bool> {
        self.exploration.is_known(x, y)
    }

    /// Make the whole level visible until [`Self::conceal`]
    pub fn reveal_all(&mut self) {
        self.exploration.reveal_all();
    }

    pub fn conceal(&mut self) {
        self.exploration.conceal();
    }

    /// Check if `to` can be seen from `from`, regardless of distance
    pub fn has_line_of_sight(&self, from: (i32, i32), to: (i32, i32)) -> Result<bool> {
        vision::has_line_of_sight(&self.grid, from, to)
    }

    /// Render the level as the observer knows it
    ///
    /// Unseen cells are blank; remembered and visible cells show their tile.
    pub fn render_known(&self, observer: Option<(i32, i32)>) -> String {
        let mut out = String::with_capacity((self.grid.width() + 1) * self.grid.height());
        for (i, (tile, state)) in self
            .grid
            .tiles()
            .iter()
            .zip(self.exploration.cells())
            .enumerate()
        {
            let pos = self.grid.coord(i);
            out.push(if observer == Some(pos) {
                '@'
            } else if state.is_known() {
                tile.kind.symbol()
            } else {
                ' '
            });
            if pos.0 as usize == self.grid.width() - 1 {
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::generate;
    use crate::error::EngineError;

    fn level() -> Level {
        generate(
            42,
            &GenerationParams::new(20, 15)
                .with_room_count(4, 8)
                .with_room_size((3, 3), (6, 6)),
        )
        .unwrap()
    }

    fn first_door(level: &Level) -> Option<(i32, i32)> {
        level
            .grid()
            .tiles()
            .iter()
            .position(|t| t.kind == TileKind::Door)
            .map(|i| level.grid().coord(i))
    }

    #[test]
    fn test_queries_out_of_bounds() {
        let level = level();
        assert!(matches!(
            level.is_walkable(20, 0),
            Err(EngineError::OutOfBounds { .. })
        ));
        assert!(level.is_opaque(0, -1).is_err());
        assert!(level.is_visible(-1, 0).is_err());
        assert!(level.is_known(0, 15).is_err());
    }

    #[test]
    fn test_entry_and_exit_walkable() {
        let level = level();
        let (ex, ey) = level.entry();
        assert!(level.is_walkable(ex, ey).unwrap());
        assert_eq!(level.tile(ex, ey).unwrap().kind, TileKind::StairsUp);
        let (xx, xy) = level.exit();
        assert_eq!(level.tile(xx, xy).unwrap().kind, TileKind::StairsDown);
        assert!(level.path_distance(level.entry(), level.exit()).unwrap().is_some());
    }

    #[test]
    fn test_room_at() {
        let level = level();
        let (x, y) = level.rooms()[2].center();
        assert_eq!(level.room_at(x, y), Some(2));
        assert_eq!(level.room_at(0, 0), None);
    }

    #[test]
    fn test_random_floor_position() {
        let level = level();
        let mut rng = GameRng::new(3);
        for _ in 0..50 {
            let (x, y) = level.random_floor_position(&mut rng).unwrap();
            assert_eq!(level.tile(x, y).unwrap().kind, TileKind::Floor);
        }
    }

    #[test]
    fn test_door_toggle() {
        let mut level = level();
        let Some((x, y)) = first_door(&level) else {
            return;
        };
        assert!(!level.open_door(x, y).unwrap());
        assert!(level.close_door(x, y).unwrap());
        assert!(level.is_opaque(x, y).unwrap());
        assert!(!level.is_walkable(x, y).unwrap());
        assert!(!level.close_door(x, y).unwrap());
        assert!(level.open_door(x, y).unwrap());
        assert!(level.is_walkable(x, y).unwrap());

        let (fx, fy) = level.entry();
        assert!(!level.open_door(fx, fy).unwrap());
        assert!(level.open_door(-1, 0).is_err());
    }

    #[test]
    fn test_use_exit() {
        let mut level = level();
        assert!(!level.exit_used());
        level.use_exit();
        assert!(level.exit_used());
    }

    #[test]
    fn test_recompute_visibility_from_entry() {
        let mut level = level();
        let entry = level.entry();
        let map = level.recompute_visibility(entry, 6).unwrap();
        assert!(map.is_visible(entry.0, entry.1).unwrap());
        assert!(level.is_known(entry.0, entry.1).unwrap());
        assert!(level.recompute_visibility((99, 99), 6).is_err());
        assert!(level.is_visible(entry.0, entry.1).unwrap());
    }

    #[test]
    fn test_recompute_visibility_huge_radius() {
        let mut level = level();
        let entry = level.entry();
        let bounded = level.recompute_visibility(entry, 40).unwrap().count_visible();
        let map = level.recompute_visibility(entry, i32::MAX).unwrap();
        assert_eq!(map.count_visible(), bounded);
        assert!(map.count_visible() > 1);
    }

    #[test]
    fn test_render_known() {
        let mut level = level();
        let blank = level.render_known(None);
        assert_eq!(blank.lines().count(), 15);
        assert!(blank.lines().all(|l| l.len() == 20 && l.trim().is_empty()));

        level.reveal_all();
        let entry = level.entry();
        let full = level.render_known(Some(entry));
        assert!(full.contains('@'));
        assert!(full.contains('>'));
        assert!(!full.contains('<'));
    }
}
