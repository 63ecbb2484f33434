//! Level generation
//!
//! Partition the grid, carve one room per leaf, connect the rooms and
//! place the stairs. Either a fully connected level comes back or nothing
//! does.

use core::cmp::Reverse;

use tracing::{debug, info, warn};

use super::corridor::{generate_corridors, place_doors, Corridor};
use super::flood::DistanceMap;
use super::grid::Grid;
use super::level::Level;
use super::partition::PartitionTree;
use super::rect::Rect;
use super::room::Room;
use super::tile::TileKind;
use crate::config::GenerationParams;
use crate::consts::GENERATION_ATTEMPTS;
use crate::error::{EngineError, Result};
use crate::rng::GameRng;

/// Everything a finished generation pass produces
pub(crate) struct Layout {
    pub grid: Grid,
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    pub entry: (i32, i32),
    pub exit: (i32, i32),
}

/// Generate a level from a seed
///
/// Identical seeds and parameters always produce identical levels.
pub fn generate(seed: u64, params: &GenerationParams) -> Result<Level> {
    params.validate()?;
    let mut rng = GameRng::new(seed);

    for attempt in 0..GENERATION_ATTEMPTS {
        if let Some(layout) = build_layout(params, &mut rng)? {
            info!(
                seed,
                rooms = layout.rooms.len(),
                corridors = layout.corridors.len(),
                "generated level"
            );
            return Ok(Level::from_layout(seed, params.clone(), layout));
        }
        warn!(seed, attempt, "too few rooms placed, repartitioning");
    }

    Err(EngineError::invalid(format!(
        "could not place {} rooms in a {}x{} grid after {GENERATION_ATTEMPTS} attempts",
        params.min_rooms, params.width, params.height
    )))
}

/// One partition-carve-connect pass; None when too few rooms fit
fn build_layout(params: &GenerationParams, rng: &mut GameRng) -> Result<Option<Layout>> {
    let mut grid = Grid::new(params.width, params.height)?;

    let tree = PartitionTree::build(Rect::new(0, 0, params.width, params.height), params, rng);
    let rooms = tree.place_rooms(params, rng);
    if rooms.len() < params.min_rooms {
        debug!(rooms = rooms.len(), min = params.min_rooms, "not enough rooms");
        return Ok(None);
    }

    for room in &rooms {
        grid.fill_rect(&room.rect(), TileKind::Floor)?;
    }

    let corridors = generate_corridors(&mut grid, &rooms, rng)?;
    if params.doors {
        place_doors(&mut grid, &rooms)?;
    }

    let (entry, exit) = place_stairs(&mut grid, &rooms)?;
    verify_connected(&grid, &rooms, entry)?;

    Ok(Some(Layout {
        grid,
        rooms,
        corridors,
        entry,
        exit,
    }))
}

/// Put the up stairs in the first room and the down stairs as far away
/// as the corridors allow
fn place_stairs(grid: &mut Grid, rooms: &[Room]) -> Result<((i32, i32), (i32, i32))> {
    let entry = rooms[0].center();
    let fill = DistanceMap::from_start(grid, entry)?;

    let farthest_room = rooms
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(i, r)| {
            let (x, y) = r.center();
            fill.get(x, y).map(|d| (i, d))
        })
        .max_by_key(|&(i, d)| (d, Reverse(i)))
        .map(|(i, _)| i);

    // A lone room has no corridors, so every reached cell is inside it
    let exit = match farthest_room {
        Some(i) => rooms[i].center(),
        None => match fill.farthest() {
            Some((cell, d)) if d > 0 => cell,
            _ => {
                return Err(EngineError::invalid(
                    "a single 1x1 room leaves no cell for the exit",
                ));
            }
        },
    };

    grid.set_kind(entry.0, entry.1, TileKind::StairsUp)?;
    grid.set_kind(exit.0, exit.1, TileKind::StairsDown)?;
    debug!(?entry, ?exit, "placed stairs");
    Ok((entry, exit))
}

/// Every room center must be reachable from the entry
fn verify_connected(grid: &Grid, rooms: &[Room], entry: (i32, i32)) -> Result<()> {
    let fill = DistanceMap::from_start(grid, entry)?;
    match rooms.iter().position(|r| {
        let (x, y) = r.center();
        !fill.reached(x, y)
    }) {
        Some(i) => Err(EngineError::invalid(format!(
            "room {i} is unreachable from the entry"
        ))),
        None => Ok(()),
    }
}
