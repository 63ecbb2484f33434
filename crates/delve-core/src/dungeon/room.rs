//! Rooms carved into partition leaves

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::rng::GameRng;

/// A rectangular room of floor tiles surrounded by a 1-tile wall border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Left x coordinate of the floor area
    pub x: usize,
    /// Top y coordinate of the floor area
    pub y: usize,
    /// Floor width
    pub width: usize,
    /// Floor height
    pub height: usize,
}

impl Room {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Floor area as a rectangle
    pub const fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Floor area plus its wall border
    pub const fn wall_rect(&self) -> Rect {
        self.rect().inflate(1)
    }

    /// Check if two rooms come within `buffer` cells of each other
    pub fn overlaps(&self, other: &Room, buffer: usize) -> bool {
        self.rect().inflate(buffer).intersects(&other.rect().inflate(buffer))
    }

    /// Center cell
    pub fn center(&self) -> (i32, i32) {
        let (x, y) = self.rect().center();
        (x as i32, y as i32)
    }

    /// Check if a cell is on the room's floor
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rect().contains_point(x, y)
    }

    /// Check if a cell is on the room's wall border
    pub fn on_border(&self, x: i32, y: i32) -> bool {
        self.wall_rect().contains_point(x, y) && !self.contains(x, y)
    }

    /// Pick a random floor cell
    pub fn random_point(&self, rng: &mut GameRng) -> (i32, i32) {
        let x = self.x + rng.rn2(self.width as u32) as usize;
        let y = self.y + rng.rn2(self.height as u32) as usize;
        (x as i32, y as i32)
    }

    pub const fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Find the room whose floor contains a cell
pub fn room_at(rooms: &[Room], x: i32, y: i32) -> Option<usize> {
    rooms.iter().position(|r| r.contains(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_area() {
        let room = Room::new(2, 3, 5, 4);
        assert_eq!(room.center(), (4, 5));
        assert_eq!(room.area(), 20);
    }

    #[test]
    fn test_contains_and_border() {
        let room = Room::new(2, 2, 3, 3);
        assert!(room.contains(2, 2));
        assert!(room.contains(4, 4));
        assert!(!room.contains(5, 4));
        assert!(room.on_border(1, 1));
        assert!(room.on_border(5, 3));
        assert!(!room.on_border(3, 3));
        assert!(!room.on_border(6, 3));
    }

    #[test]
    fn test_overlaps_with_buffer() {
        let a = Room::new(1, 1, 3, 3);
        let b = Room::new(5, 1, 3, 3);
        // One wall column between the floors
        assert!(!a.overlaps(&b, 0));
        assert!(a.overlaps(&b, 1));
        let c = Room::new(6, 1, 3, 3);
        assert!(!a.overlaps(&c, 1));
    }

    #[test]
    fn test_random_point_inside() {
        let room = Room::new(10, 10, 4, 2);
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            let (x, y) = room.random_point(&mut rng);
            assert!(room.contains(x, y));
        }
    }

    #[test]
    fn test_room_at() {
        let rooms = [Room::new(1, 1, 3, 3), Room::new(10, 1, 3, 3)];
        assert_eq!(room_at(&rooms, 2, 2), Some(0));
        assert_eq!(room_at(&rooms, 11, 3), Some(1));
        assert_eq!(room_at(&rooms, 6, 2), None);
    }
}
