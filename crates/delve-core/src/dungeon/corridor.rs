//! Corridor generation
//!
//! Joins rooms into one connected structure:
//! 1. Connect consecutive rooms (room[i] to room[i+1]) in partition order
//! 2. Flood fill from room 0 and join every unreached room to its nearest
//!    reached neighbour
//! 3. Optionally turn corridor entrances into open doors

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::flood::DistanceMap;
use super::grid::Grid;
use super::room::Room;
use super::tile::{DoorState, TileKind};
use crate::error::{EngineError, Result};
use crate::rng::GameRng;

/// An L-shaped (or straight) path between two cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corridor {
    pub from: (i32, i32),
    pub to: (i32, i32),
    /// Run the horizontal leg first, then the vertical one
    pub horizontal_first: bool,
}

impl Corridor {
    pub const fn new(from: (i32, i32), to: (i32, i32), horizontal_first: bool) -> Self {
        Self {
            from,
            to,
            horizontal_first,
        }
    }

    /// Cell where the two legs meet
    pub const fn corner(&self) -> (i32, i32) {
        if self.horizontal_first {
            (self.to.0, self.from.1)
        } else {
            (self.from.0, self.to.1)
        }
    }

    /// Every cell on the path from `from` to `to`, in walking order
    pub fn cells(&self) -> Vec<(i32, i32)> {
        let corner = self.corner();
        let mut cells = straight_line(self.from, corner);
        cells.extend(straight_line(corner, self.to).into_iter().skip(1));
        cells
    }

    /// Number of steps along the path
    pub fn len(&self) -> u32 {
        self.from.0.abs_diff(self.to.0) + self.from.1.abs_diff(self.to.1)
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// Cells on an axis-aligned segment, both ends included
fn straight_line(a: (i32, i32), b: (i32, i32)) -> Vec<(i32, i32)> {
    let dx = (b.0 - a.0).signum();
    let dy = (b.1 - a.1).signum();
    let steps = a.0.abs_diff(b.0).max(a.1.abs_diff(b.1)) as i32;
    (0..=steps).map(|i| (a.0 + dx * i, a.1 + dy * i)).collect()
}

/// Turn every wall cell on the corridor into floor
///
/// Floor, doors and stairs are left untouched, so carving never removes
/// an existing passage.
pub fn dig_corridor(grid: &mut Grid, corridor: &Corridor) -> Result<()> {
    for (x, y) in corridor.cells() {
        if grid.get(x, y)?.kind == TileKind::Wall {
            grid.set_kind(x, y, TileKind::Floor)?;
        }
    }
    Ok(())
}

/// Join two rooms center to center, picking the leg order at random
fn join_rooms(grid: &mut Grid, a: &Room, b: &Room, rng: &mut GameRng) -> Result<Corridor> {
    let corridor = Corridor::new(a.center(), b.center(), rng.one_in(2));
    dig_corridor(grid, &corridor)?;
    Ok(corridor)
}

/// Index of the reached room whose center is closest to `rooms[target]`
fn nearest_reached(rooms: &[Room], reached: &[bool], target: usize) -> Option<usize> {
    let (tx, ty) = rooms[target].center();
    rooms
        .iter()
        .enumerate()
        .filter(|&(i, _)| reached[i])
        .min_by_key(|&(i, r)| {
            let (x, y) = r.center();
            let (dx, dy) = ((x - tx) as i64, (y - ty) as i64);
            (dx * dx + dy * dy, i)
        })
        .map(|(i, _)| i)
}

/// Connect all rooms and return the corridors carved
///
/// Rooms are joined in list order. The list order is the partition
/// traversal order and is part of the level's deterministic topology.
pub fn generate_corridors(
    grid: &mut Grid,
    rooms: &[Room],
    rng: &mut GameRng,
) -> Result<Vec<Corridor>> {
    let mut corridors = Vec::with_capacity(rooms.len());
    if rooms.is_empty() {
        return Ok(corridors);
    }

    // Phase 1: consecutive rooms
    for pair in rooms.windows(2) {
        corridors.push(join_rooms(grid, &pair[0], &pair[1], rng)?);
    }

    // Phase 2: reachability repair
    ensure_connected(grid, rooms, rng, &mut corridors)?;
    debug!(corridors = corridors.len(), "all rooms connected");
    Ok(corridors)
}

/// Join every room not reachable from room 0 to its nearest reached room
///
/// Each pass reaches at least one more room, so `rooms.len()` passes are
/// always enough when nothing but wall lies between room centers.
fn ensure_connected(
    grid: &mut Grid,
    rooms: &[Room],
    rng: &mut GameRng,
    corridors: &mut Vec<Corridor>,
) -> Result<()> {
    if rooms.is_empty() {
        return Ok(());
    }
    for _ in 0..=rooms.len() {
        let fill = DistanceMap::from_start(grid, rooms[0].center())?;
        let reached: Vec<bool> = rooms
            .iter()
            .map(|r| {
                let (x, y) = r.center();
                fill.reached(x, y)
            })
            .collect();

        let Some(target) = reached.iter().position(|&r| !r) else {
            return Ok(());
        };

        warn!(room = target, "room unreachable, adding corridor");
        if let Some(source) = nearest_reached(rooms, &reached, target) {
            corridors.push(join_rooms(grid, &rooms[source], &rooms[target], rng)?);
        }
    }

    Err(EngineError::invalid("rooms could not be connected"))
}

/// Check whether a border cell forms a doorway: walls on both sides along
/// the border, walkable cells across it
fn is_doorway(grid: &Grid, room: &Room, x: i32, y: i32) -> bool {
    let wall = room.wall_rect();
    let on_horizontal_edge = y == wall.y as i32 || y == wall.bottom() as i32 - 1;
    let (along, across) = if on_horizontal_edge {
        ((1, 0), (0, 1))
    } else {
        ((0, 1), (1, 0))
    };

    let solid = |(dx, dy): (i32, i32)| {
        matches!(grid.get(x + dx, y + dy), Ok(t) if t.kind == TileKind::Wall)
    };
    let open = |(dx, dy): (i32, i32)| matches!(grid.get(x + dx, y + dy), Ok(t) if t.is_walkable());

    solid(along) && solid((-along.0, -along.1)) && open(across) && open((-across.0, -across.1))
}

/// Place open doors where corridors cross room borders
///
/// Returns the number of doors placed.
pub fn place_doors(grid: &mut Grid, rooms: &[Room]) -> Result<usize> {
    let mut placed = 0;
    for room in rooms {
        let wall = room.wall_rect();
        let (left, top) = (wall.x as i32, wall.y as i32);
        let (right, bottom) = (wall.right() as i32 - 1, wall.bottom() as i32 - 1);

        let edges = (left + 1..right)
            .flat_map(|x| [(x, top), (x, bottom)])
            .chain((top + 1..bottom).flat_map(|y| [(left, y), (right, y)]));

        for (x, y) in edges.collect::<Vec<_>>() {
            if !grid.in_bounds(x, y) || grid.get(x, y)?.kind != TileKind::Floor {
                continue;
            }
            if is_doorway(grid, room, x, y) {
                grid.set_door(x, y, DoorState::OPEN)?;
                placed += 1;
            }
        }
    }
    debug!(doors = placed, "placed doors");
    Ok(placed)
}
