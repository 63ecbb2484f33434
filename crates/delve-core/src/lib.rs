//! delve-core: dungeon generation and visibility engine
//!
//! Builds a level from a seed (binary space partitioning, room carving,
//! corridor joining, stairs placement) and tracks what a single observer
//! sees and remembers as it moves through the level.
//!
//! The crate holds no global state and performs no terminal I/O.

pub mod config;
pub mod dungeon;
pub mod snapshot;
pub mod vision;

mod consts;
mod error;
mod rng;

pub use config::{ConfigError, EngineConfig, GenerationParams};
pub use consts::*;
pub use dungeon::{generate, Descent, Level};
pub use error::{EngineError, Result};
pub use rng::GameRng;
pub use snapshot::LevelSnapshot;
pub use vision::{Exploration, ExplorationMap, VisionMode};
