//! Descending through a stack of generated levels
//!
//! Only the current level is kept. Each depth gets its own seed derived
//! from the base seed, so depth N of a run is reproducible without
//! generating the levels above it.

use std::mem;

use tracing::info;

use super::generation::generate;
use super::level::Level;
use crate::config::GenerationParams;
use crate::error::Result;

/// The current level of a run and how deep it is
#[derive(Debug, Clone)]
pub struct Descent {
    base_seed: u64,
    depth: u32,
    params: GenerationParams,
    level: Level,
}

impl Descent {
    /// Start a run at depth 1
    pub fn new(base_seed: u64, params: GenerationParams) -> Result<Self> {
        let level = generate(Self::level_seed(base_seed, 1), &params)?;
        Ok(Self {
            base_seed,
            depth: 1,
            params,
            level,
        })
    }

    /// Seed for the level at `depth`
    pub fn level_seed(base_seed: u64, depth: u32) -> u64 {
        // SplitMix64 finalizer over the base seed offset by depth
        let mut z = base_seed.wrapping_add(u64::from(depth).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    /// Take the down stairs and generate the next level
    ///
    /// Returns the level left behind, its exit marked as used. On failure
    /// the current level and depth are kept.
    pub fn descend(&mut self) -> Result<Level> {
        let depth = self.depth + 1;
        let next = generate(Self::level_seed(self.base_seed, depth), &self.params)?;
        let mut previous = mem::replace(&mut self.level, next);
        previous.use_exit();
        self.depth = depth;
        info!(depth, seed = self.level.seed(), "descended");
        Ok(previous)
    }
}
