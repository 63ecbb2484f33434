//! Observer visibility and exploration memory

mod exploration;
mod los;

pub use exploration::{Exploration, ExplorationMap, VisionMode};
pub use los::{field_of_view, has_line_of_sight, line};
