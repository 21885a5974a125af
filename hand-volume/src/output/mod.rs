mod display;
mod level;
mod sinks;

pub use display::{DisplayContext, LevelPoster};
pub use level::{map_to_level, LevelMapper, LevelUpdate, SharedLevel};
pub use sinks::{CommandSink, LogSink, MeterDisplay};

use anyhow::Result;

/// Trait for output-level destinations (system volume, a mixer, a log)
///
/// Only ever called from the display context.
pub trait OutputSink {
    /// Apply a new level out of `max_level`
    fn set_level(&mut self, level: u32, max_level: u32) -> Result<()>;
}

/// Trait for widgets that render the current level
pub trait LevelDisplay {
    fn show(&mut self, level: u32, max_level: u32);
}
