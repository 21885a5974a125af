use image::{DynamicImage, GrayImage};

use crate::error::ClassifierError;

/// One camera frame as delivered by a frame source.
///
/// The classifier only accepts [`DynamicImage::ImageLuma8`]; anything else is
/// rejected with [`ClassifierError::InvalidFormat`].
pub type Frame = DynamicImage;

/// Two-valued image: 255 is foreground, 0 is background.
pub type BinaryMask = GrayImage;

/// Borrow the 8-bit luma plane of a frame, or explain why there is none.
pub fn as_luma8(frame: &Frame) -> Result<&GrayImage, ClassifierError> {
    match frame {
        DynamicImage::ImageLuma8(gray) if gray.width() > 0 && gray.height() > 0 => Ok(gray),
        other => Err(ClassifierError::InvalidFormat {
            color: other.color(),
            width: other.width(),
            height: other.height(),
        }),
    }
}
