//! Level snapshots
//!
//! A snapshot stores the seed and parameters plus the mutable runtime
//! state (door states, exploration memory, stairs usage) as flat arrays.
//! The layout itself is rebuilt from the seed on restore, so a snapshot
//! only restores against the generator that wrote it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GenerationParams;
use crate::dungeon::{generate, DoorState, Grid, Level, Tile, TileKind};
use crate::error::{EngineError, Result};
use crate::vision::{Exploration, ExplorationMap, VisionMode};

/// Serializable state of one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub seed: u64,
    pub params: GenerationParams,
    pub width: usize,
    pub height: usize,
    /// Tile kinds in row-major order
    pub tiles: Vec<TileKind>,
    /// Door state bits in row-major order
    pub doors: Vec<u8>,
    /// Exploration state in row-major order
    pub exploration: Vec<Exploration>,
    #[serde(default)]
    pub vision_mode: VisionMode,
    pub entry: (i32, i32),
    pub exit: (i32, i32),
    pub exit_used: bool,
}

impl LevelSnapshot {
    /// Rebuild the pristine level from the seed and parameters alone
    pub fn regenerate(&self) -> Result<Level> {
        generate(self.seed, &self.params)
    }

    fn check_shapes(&self) -> Result<()> {
        let cells = self.width * self.height;
        for (name, len) in [
            ("tiles", self.tiles.len()),
            ("doors", self.doors.len()),
            ("exploration", self.exploration.len()),
        ] {
            if len != cells {
                return Err(EngineError::invalid(format!(
                    "snapshot {name} has {len} cells, expected {cells} for {}x{}",
                    self.width, self.height
                )));
            }
        }
        Ok(())
    }
}

impl Level {
    /// Capture this level's state
    pub fn snapshot(&self) -> LevelSnapshot {
        let tiles = self.grid().tiles();
        LevelSnapshot {
            seed: self.seed(),
            params: self.params().clone(),
            width: self.width(),
            height: self.height(),
            tiles: tiles.iter().map(|t| t.kind).collect(),
            doors: tiles.iter().map(|t| t.door.bits()).collect(),
            exploration: self.exploration().cells().to_vec(),
            vision_mode: self.exploration().mode(),
            entry: self.entry(),
            exit: self.exit(),
            exit_used: self.exit_used(),
        }
    }

    /// Restore a level from a snapshot
    ///
    /// Fails with `InvalidParams` if the arrays do not match the stated
    /// size or the stored layout disagrees with what the seed generates.
    pub fn from_snapshot(snapshot: &LevelSnapshot) -> Result<Level> {
        snapshot.check_shapes()?;
        let mut level = snapshot.regenerate()?;

        if (level.width(), level.height()) != (snapshot.width, snapshot.height)
            || level.entry() != snapshot.entry
            || level.exit() != snapshot.exit
        {
            return Err(EngineError::invalid(
                "snapshot layout does not match its seed and parameters",
            ));
        }

        let tiles = snapshot
            .tiles
            .iter()
            .zip(&snapshot.doors)
            .map(|(&kind, &bits)| Tile {
                kind,
                door: DoorState::from_bits_truncate(bits),
            })
            .collect();
        let grid = Grid::from_tiles(snapshot.width, snapshot.height, tiles)?;

        // Only door states may differ from the generated layout
        let layout_changed = grid
            .tiles()
            .iter()
            .zip(level.grid().tiles())
            .any(|(a, b)| a.kind != b.kind);
        if layout_changed {
            return Err(EngineError::invalid(
                "snapshot tiles do not match its seed and parameters",
            ));
        }

        let exploration = ExplorationMap::from_cells(
            snapshot.width,
            snapshot.height,
            snapshot.exploration.clone(),
            snapshot.vision_mode,
        )?;
        level.restore(grid, exploration, snapshot.exit_used);
        debug!(seed = snapshot.seed, "restored level from snapshot");
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> Level {
        generate(
            42,
            &GenerationParams::new(20, 15)
                .with_room_count(4, 8)
                .with_room_size((3, 3), (6, 6)),
        )
        .unwrap()
    }

    #[test]
    fn test_snapshot_json_restores_state() {
        let mut level = level();
        let entry = level.entry();
        level.recompute_visibility(entry, 5).unwrap();
        level.use_exit();

        let json = serde_json::to_string(&level.snapshot()).unwrap();
        let snapshot: LevelSnapshot = serde_json::from_str(&json).unwrap();
        let restored = Level::from_snapshot(&snapshot).unwrap();

        assert_eq!(restored.grid(), level.grid());
        assert_eq!(restored.rooms(), level.rooms());
        assert_eq!(restored.exploration(), level.exploration());
        assert!(restored.exit_used());
    }

    #[test]
    fn test_snapshot_keeps_door_state() {
        let mut level = level();
        let door = level
            .grid()
            .tiles()
            .iter()
            .position(|t| t.kind == TileKind::Door)
            .map(|i| level.grid().coord(i));
        let Some((x, y)) = door else {
            return;
        };
        level.close_door(x, y).unwrap();

        let restored = Level::from_snapshot(&level.snapshot()).unwrap();
        assert!(restored.is_opaque(x, y).unwrap());
    }

    #[test]
    fn test_regenerate_is_pristine() {
        let mut level = level();
        level.reveal_all();
        let fresh = level.snapshot().regenerate().unwrap();
        assert_eq!(fresh.grid(), level.grid());
        assert_eq!(fresh.exploration().count_known(), 0);
    }

    #[test]
    fn test_bad_shapes_rejected() {
        let mut snapshot = level().snapshot();
        snapshot.exploration.pop();
        assert!(matches!(
            Level::from_snapshot(&snapshot),
            Err(EngineError::InvalidParams { .. })
        ));

        let mut snapshot = level().snapshot();
        snapshot.doors.push(0);
        assert!(Level::from_snapshot(&snapshot).is_err());
    }

    #[test]
    fn test_tampered_layout_rejected() {
        let mut snapshot = level().snapshot();
        snapshot.tiles[0] = TileKind::Floor;
        assert!(matches!(
            Level::from_snapshot(&snapshot),
            Err(EngineError::InvalidParams { .. })
        ));

        let mut snapshot = level().snapshot();
        snapshot.seed += 1;
        assert!(Level::from_snapshot(&snapshot).is_err());
    }
}
