use image::ColorType;
use thiserror::Error;

/// Why a single frame could not be classified.
///
/// Every variant is absorbed by the control loop and turned into a finger
/// count of zero; none of them stops the loop.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("expected a non-empty 8-bit single-channel frame, got {color:?} {width}x{height}")]
    InvalidFormat {
        color: ColorType,
        width: u32,
        height: u32,
    },

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("contour has no points")]
    EmptyContour,

    #[error("convex hull is degenerate ({points} usable points)")]
    DegenerateHull { points: usize },

    #[error("hull index {index} out of range for contour of {len} points")]
    IndexOutOfRange { index: usize, len: usize },
}
