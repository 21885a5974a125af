//! # Hand Volume
//!
//! Turns a stream of grayscale camera frames into a finger count (0-5) and
//! drives an output level, such as system volume, from it.
//!
//! Each frame runs through a fixed geometric pipeline:
//!
//! 1. **Preprocess**: Gaussian blur, then an inverted binary threshold
//!    (dark hand on a light background becomes foreground).
//! 2. **Select**: extract contours and keep the largest one above a
//!    minimum area.
//! 3. **Analyze**: convex hull and convexity defects of that contour.
//! 4. **Count**: a defect whose angle at the farthest point is acute is a
//!    gap between two extended fingers.
//! 5. **Map**: `level = max_level * fingers / 5`, posted to the display
//!    context that owns the output sink.
//!
//! Nothing is carried between frames except the last written level.
//!
//! ```rust,no_run
//! use hand_volume::{ClassifierConfig, GestureClassifier};
//!
//! let frame = image::open("hand.png")?.into_luma8();
//! let classifier = GestureClassifier::new(ClassifierConfig::default());
//! let fingers = classifier.classify(&image::DynamicImage::ImageLuma8(frame));
//! println!("{} fingers", fingers.get());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod capture;
pub mod classifier;
pub mod config;
pub mod control;
pub mod error;
pub mod frame;
pub mod output;

pub use classifier::{Classification, FingerCount, GestureClassifier, Outcome, Stage};
pub use config::ClassifierConfig;
pub use control::FrameLoop;
pub use error::{ClassifierError, GeometryError};
pub use frame::{BinaryMask, Frame};
pub use output::{map_to_level, DisplayContext, LevelDisplay, LevelMapper, OutputSink, SharedLevel};
