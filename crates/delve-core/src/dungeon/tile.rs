//! Map tile types

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Terrain kind of a single tile
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum TileKind {
    #[default]
    Wall = 0,
    Floor = 1,
    Door = 2,
    StairsDown = 3,
    StairsUp = 4,
}

impl TileKind {
    /// Get the display character for this tile kind
    pub const fn symbol(&self) -> char {
        match self {
            TileKind::Wall => '#',
            TileKind::Floor => '.',
            TileKind::Door => '+',
            TileKind::StairsDown => '>',
            TileKind::StairsUp => '<',
        }
    }
}

bitflags! {
    /// Door state flags
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct DoorState: u8 {
        const NO_DOOR = 0x00;
        const BROKEN = 0x01;
        const OPEN = 0x02;
        const CLOSED = 0x04;
        const LOCKED = 0x08;
    }
}

// Manual serde impl for DoorState
impl Serialize for DoorState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DoorState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(DoorState::from_bits_truncate(bits))
    }
}

impl DoorState {
    /// Closed or locked doors shut the doorway
    pub const fn is_shut(&self) -> bool {
        self.contains(DoorState::CLOSED) || self.contains(DoorState::LOCKED)
    }

    /// Open or broken doors can be walked through
    pub const fn is_passable(&self) -> bool {
        self.contains(DoorState::OPEN) || self.contains(DoorState::BROKEN)
    }
}

/// A single grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Terrain kind
    pub kind: TileKind,

    /// Door state, meaningful only when `kind` is `Door`
    pub door: DoorState,
}

impl Tile {
    /// Create a solid wall tile
    pub const fn wall() -> Self {
        Self {
            kind: TileKind::Wall,
            door: DoorState::NO_DOOR,
        }
    }

    /// Create a tile of the given kind with no door state
    pub const fn new(kind: TileKind) -> Self {
        Self {
            kind,
            door: DoorState::NO_DOOR,
        }
    }

    /// Create a door tile in the given state
    pub const fn door(state: DoorState) -> Self {
        Self {
            kind: TileKind::Door,
            door: state,
        }
    }

    /// Check if an entity may stand on or move through this tile
    pub const fn is_walkable(&self) -> bool {
        match self.kind {
            TileKind::Wall => false,
            TileKind::Floor | TileKind::StairsDown | TileKind::StairsUp => true,
            TileKind::Door => self.door.is_passable() && !self.door.is_shut(),
        }
    }

    /// Check if this tile blocks line of sight
    pub const fn is_opaque(&self) -> bool {
        match self.kind {
            TileKind::Wall => true,
            TileKind::Floor | TileKind::StairsDown | TileKind::StairsUp => false,
            TileKind::Door => self.door.is_shut(),
        }
    }
}
