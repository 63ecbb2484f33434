//! Per-cell exploration memory
//!
//! Every cell is Unseen, Remembered or Visible. A recompute makes exactly
//! the cells in the new field of view Visible, demotes the rest of the
//! previous view to Remembered and never forgets a cell once known.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::trace;

use super::los::visible_indices;
use crate::dungeon::Grid;
use crate::error::{EngineError, Result};

/// What the observer knows about a cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Exploration {
    /// Never seen
    #[default]
    Unseen,
    /// Seen before, not in view now
    Remembered,
    /// In the current field of view
    Visible,
}

impl Exploration {
    pub const fn is_visible(&self) -> bool {
        matches!(self, Exploration::Visible)
    }

    /// Seen at least once
    pub const fn is_known(&self) -> bool {
        !matches!(self, Exploration::Unseen)
    }
}

/// How visibility is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum VisionMode {
    /// Ray-marched field of view around the observer
    #[default]
    LineOfSight,
    /// Every cell visible regardless of the observer (debug view)
    RevealAll,
}

/// Exploration state for every cell of one grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorationMap {
    width: usize,
    height: usize,
    cells: Vec<Exploration>,
    mode: VisionMode,
}

impl ExplorationMap {
    /// A map with nothing seen yet
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Exploration::Unseen; width * height],
            mode: VisionMode::LineOfSight,
        }
    }

    pub(crate) fn from_cells(
        width: usize,
        height: usize,
        cells: Vec<Exploration>,
        mode: VisionMode,
    ) -> Result<Self> {
        if cells.len() != width * height {
            return Err(EngineError::invalid(format!(
                "expected {} exploration cells for {width}x{height}, got {}",
                width * height,
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
            mode,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mode(&self) -> VisionMode {
        self.mode
    }

    /// Recompute the field of view for an observer
    ///
    /// Fails without touching any state if the observer lies outside the
    /// grid. In [`VisionMode::RevealAll`] the observer is still checked but
    /// every cell stays visible.
    pub fn recompute(&mut self, grid: &Grid, observer: (i32, i32), radius: i32) -> Result<()> {
        if grid.width() != self.width || grid.height() != self.height {
            return Err(EngineError::invalid(format!(
                "exploration map is {}x{} but grid is {}x{}",
                self.width,
                self.height,
                grid.width(),
                grid.height()
            )));
        }

        // Compute the whole new view before mutating anything
        let visible = visible_indices(grid, observer, radius)?;
        if self.mode == VisionMode::RevealAll {
            return Ok(());
        }

        let mut in_view = vec![false; self.cells.len()];
        for idx in visible {
            in_view[idx] = true;
        }
        for (cell, seen) in self.cells.iter_mut().zip(in_view) {
            *cell = match (*cell, seen) {
                (_, true) => Exploration::Visible,
                (Exploration::Visible, false) => Exploration::Remembered,
                (other, false) => other,
            };
        }

        trace!(?observer, radius, visible = self.count_visible(), "recomputed view");
        Ok(())
    }

    /// Mark every cell visible and keep it that way until [`Self::conceal`]
    pub fn reveal_all(&mut self) {
        self.mode = VisionMode::RevealAll;
        self.cells.fill(Exploration::Visible);
    }

    /// Return to line-of-sight mode
    ///
    /// Cells stay Visible until the next recompute demotes them, after
    /// which everything revealed is Remembered.
    pub fn conceal(&mut self) {
        self.mode = VisionMode::LineOfSight;
    }

    /// Forget everything
    pub fn reset(&mut self) {
        self.mode = VisionMode::LineOfSight;
        self.cells.fill(Exploration::Unseen);
    }

    fn index(&self, x: i32, y: i32) -> Result<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Err(EngineError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width + x as usize)
    }

    /// Exploration state of a cell
    pub fn state(&self, x: i32, y: i32) -> Result<Exploration> {
        Ok(self.cells[self.index(x, y)?])
    }

    pub fn is_visible(&self, x: i32, y: i32) -> Result<bool> {
        Ok(self.state(x, y)?.is_visible())
    }

    /// Visible or remembered
    pub fn is_known(&self, x: i32, y: i32) -> Result<bool> {
        Ok(self.state(x, y)?.is_known())
    }

    pub fn count_visible(&self) -> usize {
        self.cells.iter().filter(|c| c.is_visible()).count()
    }

    pub fn count_known(&self) -> usize {
        self.cells.iter().filter(|c| c.is_known()).count()
    }

    /// Coordinates of every visible cell in row-major order
    pub fn visible_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_visible())
            .map(|(i, _)| ((i % self.width) as i32, (i / self.width) as i32))
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Exploration] {
        &self.cells
    }
}
