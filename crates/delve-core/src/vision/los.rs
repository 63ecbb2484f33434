//! Ray-marched line of sight
//!
//! A cell is visible when the Bresenham line from the observer reaches it
//! without passing through an opaque cell first. The blocking cell itself
//! is visible, so walls bounding a room show up.
//!
//! Rays are cast from the observer outward only. Bresenham lines are not
//! symmetric, so A seeing B does not guarantee B sees A.

use crate::dungeon::Grid;
use crate::error::Result;

/// Cells on the Bresenham line from `from` to `to`, both ends included
///
/// On a tie the x step is taken before the y step.
pub fn line(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut cells = Vec::with_capacity((dx - dy) as usize + 1);
    loop {
        cells.push((x, y));
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}

/// Check if `to` is visible from `from`, ignoring distance
///
/// Both endpoints must lie inside the grid. The endpoints themselves never
/// block; only opaque cells strictly between them do.
pub fn has_line_of_sight(grid: &Grid, from: (i32, i32), to: (i32, i32)) -> Result<bool> {
    grid.index(from.0, from.1)?;
    grid.index(to.0, to.1)?;
    Ok(unobstructed(grid, from, to))
}

fn unobstructed(grid: &Grid, from: (i32, i32), to: (i32, i32)) -> bool {
    let cells = line(from, to);
    cells
        .iter()
        .skip(1)
        .take(cells.len().saturating_sub(2))
        .all(|&(x, y)| matches!(grid.get(x, y), Ok(t) if !t.is_opaque()))
}

/// Arena indices of every cell visible from `observer` within `radius`
///
/// The radius is Euclidean: a cell at offset (dx, dy) is a candidate when
/// `dx² + dy² <= radius²`. The observer's own cell is always included, and
/// a negative radius sees nothing else.
pub(crate) fn visible_indices(grid: &Grid, observer: (i32, i32), radius: i32) -> Result<Vec<usize>> {
    let origin = grid.index(observer.0, observer.1)?;
    let mut visible = vec![origin];
    if radius <= 0 {
        return Ok(visible);
    }

    // No cell is farther than width + height from any other
    let (ox, oy) = (i64::from(observer.0), i64::from(observer.1));
    let (width, height) = (grid.width() as i64, grid.height() as i64);
    let reach = i64::from(radius).min(width + height);
    let r2 = reach * reach;
    for y in (oy - reach).max(0)..=(oy + reach).min(height - 1) {
        for x in (ox - reach).max(0)..=(ox + reach).min(width - 1) {
            let (dx, dy) = (x - ox, y - oy);
            let (x, y) = (x as i32, y as i32);
            if (x, y) == observer || dx * dx + dy * dy > r2 {
                continue;
            }
            if unobstructed(grid, observer, (x, y)) {
                visible.push(grid.index(x, y)?);
            }
        }
    }
    Ok(visible)
}

/// Every cell visible from `observer` within `radius`, observer first
pub fn field_of_view(grid: &Grid, observer: (i32, i32), radius: i32) -> Result<Vec<(i32, i32)>> {
    Ok(visible_indices(grid, observer, radius)?
        .into_iter()
        .map(|i| grid.coord(i))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Rect, TileKind};

    fn open_room() -> Grid {
        let mut grid = Grid::new(11, 11).unwrap();
        grid.fill_rect(&Rect::new(1, 1, 9, 9), TileKind::Floor).unwrap();
        grid
    }

    #[test]
    fn test_line_endpoints() {
        assert_eq!(line((0, 0), (3, 0)), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(line((2, 2), (2, 2)), vec![(2, 2)]);
        let diag = line((0, 0), (3, 3));
        assert_eq!(diag, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
        let steep = line((5, 5), (4, 1));
        assert_eq!(steep.first(), Some(&(5, 5)));
        assert_eq!(steep.last(), Some(&(4, 1)));
        assert_eq!(steep.len(), 5);
    }

    #[test]
    fn test_line_is_connected() {
        for to in [(7, 2), (-3, 5), (0, -6), (4, 4), (-5, -1)] {
            let cells = line((0, 0), to);
            for pair in cells.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                assert!((a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_wall_blocks_sight() {
        let mut grid = open_room();
        grid.set_kind(5, 3, TileKind::Wall).unwrap();
        assert!(!has_line_of_sight(&grid, (5, 5), (5, 1)).unwrap());
        // The wall itself is seen
        assert!(has_line_of_sight(&grid, (5, 5), (5, 3)).unwrap());
        assert!(has_line_of_sight(&grid, (5, 5), (1, 5)).unwrap());
    }

    #[test]
    fn test_line_of_sight_out_of_bounds() {
        let grid = open_room();
        assert!(has_line_of_sight(&grid, (5, 5), (11, 5)).is_err());
        assert!(has_line_of_sight(&grid, (-1, 5), (5, 5)).is_err());
    }

    #[test]
    fn test_field_of_view_radius() {
        let grid = open_room();
        let fov = field_of_view(&grid, (5, 5), 2).unwrap();
        assert_eq!(fov[0], (5, 5));
        assert!(fov.contains(&(5, 3)));
        assert!(fov.contains(&(6, 6)));
        // (7, 7) is sqrt(8) > 2 away
        assert!(!fov.contains(&(7, 7)));
        assert!(fov.iter().all(|&(x, y)| (x - 5).pow(2) + (y - 5).pow(2) <= 4));
    }

    #[test]
    fn test_zero_radius_sees_only_observer() {
        let grid = open_room();
        assert_eq!(field_of_view(&grid, (5, 5), 0).unwrap(), vec![(5, 5)]);
        assert_eq!(field_of_view(&grid, (5, 5), -3).unwrap(), vec![(5, 5)]);
    }

    #[test]
    fn test_huge_radius_sees_whole_room() {
        let grid = open_room();
        let all = field_of_view(&grid, (5, 5), 30).unwrap();
        assert_eq!(field_of_view(&grid, (5, 5), i32::MAX).unwrap(), all);
        assert_eq!(field_of_view(&grid, (0, 10), i32::MAX).unwrap()[0], (0, 10));
        // Floor plus its wall ring
        assert_eq!(all.len(), 11 * 11);
    }

    #[test]
    fn test_observer_inside_wall() {
        let grid = open_room();
        // The observer's own cell never blocks, the rest of the wall row does
        let fov = field_of_view(&grid, (0, 0), 3).unwrap();
        assert!(fov.contains(&(0, 0)));
        assert!(fov.contains(&(1, 1)));
        assert!(fov.contains(&(1, 0)));
        assert!(!fov.contains(&(3, 0)));
    }
}
