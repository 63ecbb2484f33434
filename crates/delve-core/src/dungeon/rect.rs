//! Axis-aligned rectangles used by partitioning and rooms
//!
//! Coordinates are half-open: a rectangle covers `x..x + width` by
//! `y..y + height`.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle of grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left x coordinate
    pub x: usize,
    /// Top y coordinate
    pub y: usize,
    /// Width in cells
    pub width: usize,
    /// Height in cells
    pub height: usize,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the rightmost column
    pub const fn right(&self) -> usize {
        self.x + self.width
    }

    /// One past the bottom row
    pub const fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Number of cells covered
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// Center cell, rounding towards the bottom-right on even sides
    pub const fn center(&self) -> (usize, usize) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Check if a cell lies inside the rectangle
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) >= self.x
            && (x as usize) < self.right()
            && (y as usize) >= self.y
            && (y as usize) < self.bottom()
    }

    /// Check if this rectangle contains another
    pub const fn contains(&self, other: &Rect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    /// Check if this rectangle shares at least one cell with another
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grow by `n` cells on every side, stopping at the origin
    pub const fn inflate(&self, n: usize) -> Rect {
        let x = self.x.saturating_sub(n);
        let y = self.y.saturating_sub(n);
        Rect {
            x,
            y,
            width: self.right() + n - x,
            height: self.bottom() + n - y,
        }
    }

    /// Iterate over every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| (x, y)))
    }
}
