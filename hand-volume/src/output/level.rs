use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::classifier::FingerCount;

use super::display::LevelPoster;

/// Last level written to the output sink, readable from any thread.
///
/// Only the display context stores into it.
#[derive(Debug, Clone, Default)]
pub struct SharedLevel(Arc<AtomicU32>);

impl SharedLevel {
    pub fn new(initial: u32) -> Self {
        Self(Arc::new(AtomicU32::new(initial)))
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn store(&self, level: u32) {
        self.0.store(level, Ordering::Release);
    }
}

/// A computed level on its way to the display context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpdate {
    pub level: u32,
    pub max_level: u32,
}

/// Linear scaling of a finger count onto `0..=max_level`.
///
/// The count is clamped into `0..=5` first, then
/// `level = floor(max_level * fingers / 5)`.
pub fn map_to_level(fingers: i32, max_level: u32) -> u32 {
    let fingers = u64::from(fingers.clamp(0, 5).unsigned_abs());
    (u64::from(max_level) * fingers / 5) as u32
}

/// Maps finger counts to levels and hands them to the display context.
#[derive(Debug, Clone)]
pub struct LevelMapper {
    max_level: u32,
    poster: LevelPoster,
}

impl LevelMapper {
    pub fn new(max_level: u32, poster: LevelPoster) -> Self {
        Self { max_level, poster }
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Compute the level for `fingers` and post it without waiting.
    pub fn apply(&self, fingers: FingerCount) -> u32 {
        let level = map_to_level(i32::from(fingers.get()), self.max_level);
        self.poster.post(LevelUpdate {
            level,
            max_level: self.max_level,
        });
        level
    }
}
