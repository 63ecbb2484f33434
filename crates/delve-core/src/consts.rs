//! Engine constants

/// Default level dimensions
pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_HEIGHT: usize = 50;

/// Default room count bounds
pub const DEFAULT_MIN_ROOMS: usize = 4;
pub const DEFAULT_MAX_ROOMS: usize = 15;

/// Default room side bounds
pub const DEFAULT_MIN_ROOM_SIZE: usize = 4;
pub const DEFAULT_MAX_ROOM_SIZE: usize = 10;

/// Default observer vision radius (Euclidean)
pub const DEFAULT_VISION_RADIUS: i32 = 10;

/// Wall tiles kept between a room and the edge of its partition leaf
pub const ROOM_MARGIN: usize = 1;

/// Split position bounds, as a fraction of the region being split
pub const SPLIT_RATIO_MIN: f64 = 0.35;
pub const SPLIT_RATIO_MAX: f64 = 0.65;

/// Full partition passes attempted before giving up on `min_rooms`
pub const GENERATION_ATTEMPTS: usize = 8;
