//! Generation parameters and engine configuration
//!
//! Configuration is plain JSON. Every field is optional; missing fields
//! take the defaults from [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::error::{EngineError, Result};

/// Parameters consumed by level generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Grid width in tiles
    pub width: usize,
    /// Grid height in tiles
    pub height: usize,

    /// Fewest rooms an accepted level may have
    pub min_rooms: usize,
    /// Most rooms a level may have
    pub max_rooms: usize,

    /// Room floor size bounds
    pub min_room_width: usize,
    pub min_room_height: usize,
    pub max_room_width: usize,
    pub max_room_height: usize,

    /// Partition depth limit; derived from `max_rooms` when unset
    pub max_depth: Option<usize>,

    /// Turn corridor entrances into open doors
    pub doors: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            min_rooms: DEFAULT_MIN_ROOMS,
            max_rooms: DEFAULT_MAX_ROOMS,
            min_room_width: DEFAULT_MIN_ROOM_SIZE,
            min_room_height: DEFAULT_MIN_ROOM_SIZE,
            max_room_width: DEFAULT_MAX_ROOM_SIZE,
            max_room_height: DEFAULT_MAX_ROOM_SIZE,
            max_depth: None,
            doors: true,
        }
    }
}

impl GenerationParams {
    /// Default parameters for a grid of the given size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Set the room count bounds
    pub fn with_room_count(mut self, min: usize, max: usize) -> Self {
        self.min_rooms = min;
        self.max_rooms = max;
        self
    }

    /// Set the room size bounds as (width, height) pairs
    pub fn with_room_size(mut self, min: (usize, usize), max: (usize, usize)) -> Self {
        (self.min_room_width, self.min_room_height) = min;
        (self.max_room_width, self.max_room_height) = max;
        self
    }

    /// Enable or disable door placement
    pub fn with_doors(mut self, doors: bool) -> Self {
        self.doors = doors;
        self
    }

    /// Smallest partition leaf that can host a room
    pub fn min_leaf(&self) -> (usize, usize) {
        (
            self.min_room_width.saturating_add(2 * ROOM_MARGIN),
            self.min_room_height.saturating_add(2 * ROOM_MARGIN),
        )
    }

    /// Depth limit for partitioning: enough levels for `max_rooms` leaves
    pub fn depth_limit(&self) -> usize {
        self.max_depth.unwrap_or_else(|| {
            self.max_rooms
                .checked_next_power_of_two()
                .map_or(usize::BITS, |n| n.trailing_zeros()) as usize
        })
    }

    /// Reject constraints no level can satisfy
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::invalid(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > i32::MAX as usize / 2 || self.height > i32::MAX as usize / 2 {
            return Err(EngineError::invalid("grid dimensions too large"));
        }
        if self.min_rooms == 0 {
            return Err(EngineError::invalid("min_rooms must be positive"));
        }
        if self.min_rooms > self.max_rooms {
            return Err(EngineError::invalid(format!(
                "min_rooms {} exceeds max_rooms {}",
                self.min_rooms, self.max_rooms
            )));
        }
        if self.min_room_width == 0 || self.min_room_height == 0 {
            return Err(EngineError::invalid("minimum room size must be positive"));
        }
        if self.min_room_width > self.max_room_width
            || self.min_room_height > self.max_room_height
        {
            return Err(EngineError::invalid(format!(
                "minimum room size {}x{} exceeds maximum {}x{}",
                self.min_room_width,
                self.min_room_height,
                self.max_room_width,
                self.max_room_height
            )));
        }

        let (leaf_w, leaf_h) = self.min_leaf();
        if leaf_w > self.width || leaf_h > self.height {
            return Err(EngineError::invalid(format!(
                "a {}x{} room with walls does not fit a {}x{} grid",
                self.min_room_width, self.min_room_height, self.width, self.height
            )));
        }
        if self.min_rooms.saturating_mul(leaf_w * leaf_h) > self.width * self.height {
            return Err(EngineError::invalid(format!(
                "{} rooms of at least {}x{} cannot fit a {}x{} grid",
                self.min_rooms, self.min_room_width, self.min_room_height, self.width, self.height
            )));
        }
        if self.min_rooms > 1 && self.depth_limit() == 0 {
            return Err(EngineError::invalid(
                "max_depth 0 allows a single room but min_rooms > 1",
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] EngineError),
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Level generation parameters
    pub generation: GenerationParams,

    /// Observer vision radius
    pub vision_radius: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generation: GenerationParams::default(),
            vision_radius: DEFAULT_VISION_RADIUS,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> core::result::Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_config(&contents)
    }

    /// Parse configuration from a JSON string and validate it
    pub fn parse_config(contents: &str) -> core::result::Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(contents)?;
        config.generation.validate()?;
        if config.vision_radius < 0 {
            return Err(EngineError::invalid("vision_radius must not be negative").into());
        }
        Ok(config)
    }
}
