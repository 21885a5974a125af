mod sequence;
mod webcam;

pub use sequence::ImageSequence;
pub use webcam::WebcamCapture;

use anyhow::Result;

use crate::frame::Frame;

/// Trait for frame sources
pub trait CaptureSource {
    /// Capture a single frame
    fn capture_frame(&mut self) -> Result<Frame>;

    /// Get the resolution of captured frames
    fn resolution(&self) -> (u32, u32);
}
