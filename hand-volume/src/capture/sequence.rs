use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::DynamicImage;

use super::CaptureSource;
use crate::frame::Frame;

const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "pgm", "tif", "tiff"];

/// Replays still images as frames, starting over after the last one.
pub struct ImageSequence {
    frames: Vec<Frame>,
    next: usize,
}

impl ImageSequence {
    /// Wrap already decoded frames.
    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        if frames.is_empty() {
            bail!("Image sequence has no frames");
        }
        Ok(Self { frames, next: 0 })
    }

    /// Load every image in `dir`, in file-name order, as 8-bit luma frames.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        tracing::info!("Loading frames from {}", dir.display());

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read frame directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            })
            .collect();
        paths.sort();

        let frames = paths
            .iter()
            .map(|path| {
                let image = image::open(path)
                    .with_context(|| format!("Failed to load frame {}", path.display()))?;
                Ok(DynamicImage::ImageLuma8(image.into_luma8()))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Loaded {} frames", frames.len());
        Self::from_frames(frames)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl CaptureSource for ImageSequence {
    fn capture_frame(&mut self) -> Result<Frame> {
        let frame = self.frames[self.next].clone();
        self.next = (self.next + 1) % self.frames.len();
        Ok(frame)
    }

    fn resolution(&self) -> (u32, u32) {
        let first = &self.frames[0];
        (first.width(), first.height())
    }
}
