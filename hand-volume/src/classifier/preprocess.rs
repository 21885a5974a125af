use image::Luma;
use imageproc::filter::gaussian_blur_f32;

use crate::config::ClassifierConfig;
use crate::error::ClassifierError;
use crate::frame::{self, BinaryMask, Frame};

/// Turns a grayscale frame into a binary mask of dark regions.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    blur_sigma: f32,
    threshold: u8,
}

impl Preprocessor {
    pub fn new(blur_sigma: f32, threshold: u8) -> Self {
        Self {
            blur_sigma,
            threshold,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.blur_sigma, config.threshold)
    }

    /// Smooth and binarize a frame
    ///
    /// Steps:
    /// 1. Reject anything that is not a non-empty 8-bit luma frame
    /// 2. Gaussian blur with the fixed sigma
    /// 3. Inverted threshold: `value > threshold` becomes 0, everything else 255
    ///
    /// The input frame is left untouched.
    pub fn preprocess(&self, frame: &Frame) -> Result<BinaryMask, ClassifierError> {
        let _span = tracing::debug_span!("preprocess").entered();

        let gray = frame::as_luma8(frame)?;

        let mut mask = if self.blur_sigma > 0.0 {
            gaussian_blur_f32(gray, self.blur_sigma)
        } else {
            gray.clone()
        };

        for pixel in mask.pixels_mut() {
            *pixel = if pixel.0[0] > self.threshold {
                Luma([0])
            } else {
                Luma([255])
            };
        }

        Ok(mask)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayAlphaImage, GrayImage};

    fn dark_square_on_white() -> Frame {
        DynamicImage::ImageLuma8(GrayImage::from_fn(40, 40, |x, y| {
            if (10..30).contains(&x) && (10..30).contains(&y) {
                Luma([10])
            } else {
                Luma([240])
            }
        }))
    }

    #[test]
    fn dark_region_becomes_foreground() {
        let mask = Preprocessor::default()
            .preprocess(&dark_square_on_white())
            .unwrap();

        assert_eq!(mask.dimensions(), (40, 40));
        assert_eq!(mask.get_pixel(20, 20).0[0], 255);
        assert_eq!(mask.get_pixel(2, 2).0[0], 0);
        assert_eq!(mask.get_pixel(37, 20).0[0], 0);
    }

    #[test]
    fn output_is_two_valued() {
        let mask = Preprocessor::default()
            .preprocess(&dark_square_on_white())
            .unwrap();
        assert!(mask.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn threshold_is_inclusive_for_foreground() {
        let frame = DynamicImage::ImageLuma8(GrayImage::from_fn(3, 1, |x, _| Luma([59 + x as u8])));
        let mask = Preprocessor::new(0.0, 60).preprocess(&frame).unwrap();

        assert_eq!(mask.get_pixel(0, 0).0[0], 255);
        assert_eq!(mask.get_pixel(1, 0).0[0], 255);
        assert_eq!(mask.get_pixel(2, 0).0[0], 0);
    }

    #[test]
    fn input_frame_is_not_modified() {
        let frame = dark_square_on_white();
        let before = frame.clone();
        let _ = Preprocessor::default().preprocess(&frame).unwrap();
        assert_eq!(frame, before);
    }

    #[test]
    fn rejects_two_channel_frame() {
        let frame = DynamicImage::ImageLumaA8(GrayAlphaImage::new(8, 8));
        let err = Preprocessor::default().preprocess(&frame).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidFormat { .. }));
    }
}
