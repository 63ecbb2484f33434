//! Dungeon layout: grid, partitioning, rooms, corridors and levels

mod corridor;
mod descent;
mod flood;
mod generation;
mod grid;
mod level;
mod partition;
mod rect;
mod room;
mod tile;

pub use corridor::{dig_corridor, generate_corridors, place_doors, Corridor};
pub use descent::Descent;
pub use flood::DistanceMap;
pub use generation::generate;
pub use grid::Grid;
pub use level::Level;
pub use partition::{Axis, PartitionNode, PartitionTree};
pub use rect::Rect;
pub use room::{room_at, Room};
pub use tile::{DoorState, Tile, TileKind};
