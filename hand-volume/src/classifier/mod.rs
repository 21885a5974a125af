mod contour;
mod fingers;
mod hull;
mod preprocess;

pub use contour::{contour_area, select_contour, SelectedContour};
pub use fingers::{count_fingers, gap_angle, FingerCount};
pub use hull::{analyze, convex_hull, convexity_defects, ConvexHull, Defect};
pub use preprocess::Preprocessor;

use crate::config::ClassifierConfig;
use crate::error::ClassifierError;
use crate::frame::Frame;

/// Where a frame currently is in one classification cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    Preprocessing,
    Selecting,
    Analyzing,
    Counting,
    Mapping,
}

/// How a classification cycle ended.
#[derive(Debug)]
pub enum Outcome {
    /// The full pipeline ran; `defects` concavities were examined.
    Counted { defects: usize },
    /// No contour survived the minimum-area filter.
    NoCandidate,
    /// The frame or its geometry was rejected.
    Rejected(ClassifierError),
}

#[derive(Debug)]
pub struct Classification {
    pub fingers: FingerCount,
    pub outcome: Outcome,
}

impl Classification {
    fn zero(outcome: Outcome) -> Self {
        Self {
            fingers: FingerCount::ZERO,
            outcome,
        }
    }
}

/// Stateless per-frame finger classifier.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: ClassifierConfig,
    preprocessor: Preprocessor,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let preprocessor = Preprocessor::from_config(&config);
        Self {
            config,
            preprocessor,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Finger count for one frame. Any failure counts as zero fingers.
    pub fn classify(&self, frame: &Frame) -> FingerCount {
        self.classify_with(frame, |_| {}).fingers
    }

    /// Run the pipeline, reporting each stage entered to `on_stage`.
    ///
    /// Errors never escape: a rejected frame, an empty scene or a
    /// degenerate hull all end the cycle early with zero fingers.
    pub fn classify_with(&self, frame: &Frame, mut on_stage: impl FnMut(Stage)) -> Classification {
        on_stage(Stage::Preprocessing);
        let mask = match self.preprocessor.preprocess(frame) {
            Ok(mask) => mask,
            Err(e) => {
                tracing::debug!("Frame rejected: {}", e);
                return Classification::zero(Outcome::Rejected(e));
            }
        };

        on_stage(Stage::Selecting);
        let Some(contour) = select_contour(&mask, &self.config) else {
            return Classification::zero(Outcome::NoCandidate);
        };

        self.classify_contour_with(&contour, on_stage)
    }

    /// Classify an already selected contour.
    pub fn classify_contour(&self, contour: &SelectedContour) -> Classification {
        self.classify_contour_with(contour, |_| {})
    }

    fn classify_contour_with(
        &self,
        contour: &SelectedContour,
        mut on_stage: impl FnMut(Stage),
    ) -> Classification {
        on_stage(Stage::Analyzing);
        let defects = match analyze(contour, self.config.min_defect_depth) {
            Ok((_, defects)) => defects,
            Err(e) => {
                tracing::debug!("Hull analysis failed: {}", e);
                return Classification::zero(Outcome::Rejected(e.into()));
            }
        };

        on_stage(Stage::Counting);
        let fingers = count_fingers(&contour.points, &defects, self.config.max_gap_angle);

        Classification {
            fingers,
            outcome: Outcome::Counted {
                defects: defects.len(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayAlphaImage, GrayImage, Luma};
    use imageproc::point::Point;

    fn white(width: u32, height: u32) -> Frame {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([255])))
    }

    fn dark_block() -> Frame {
        DynamicImage::ImageLuma8(GrayImage::from_fn(64, 64, |x, y| {
            if (16..48).contains(&x) && (16..48).contains(&y) {
                Luma([0])
            } else {
                Luma([255])
            }
        }))
    }

    fn stages_for(classifier: &GestureClassifier, frame: &Frame) -> (Classification, Vec<Stage>) {
        let mut stages = Vec::new();
        let result = classifier.classify_with(frame, |s| stages.push(s));
        (result, stages)
    }

    #[test]
    fn blank_frame_stops_after_selection() {
        let (result, stages) = stages_for(&GestureClassifier::default(), &white(64, 64));

        assert_eq!(result.fingers, FingerCount::ZERO);
        assert!(matches!(result.outcome, Outcome::NoCandidate));
        assert_eq!(stages, vec![Stage::Preprocessing, Stage::Selecting]);
    }

    #[test]
    fn malformed_frame_stops_after_preprocessing() {
        let frame = DynamicImage::ImageLumaA8(GrayAlphaImage::new(32, 32));
        let (result, stages) = stages_for(&GestureClassifier::default(), &frame);

        assert_eq!(result.fingers, FingerCount::ZERO);
        assert!(matches!(
            result.outcome,
            Outcome::Rejected(ClassifierError::InvalidFormat { .. })
        ));
        assert_eq!(stages, vec![Stage::Preprocessing]);
    }

    #[test]
    fn convex_blob_runs_every_stage() {
        let (result, stages) = stages_for(&GestureClassifier::default(), &dark_block());

        assert_eq!(result.fingers, FingerCount::ZERO);
        assert!(matches!(result.outcome, Outcome::Counted { .. }));
        assert_eq!(
            stages,
            vec![
                Stage::Preprocessing,
                Stage::Selecting,
                Stage::Analyzing,
                Stage::Counting
            ]
        );
    }

    #[test]
    fn degenerate_contour_is_absorbed() {
        let line: Vec<Point<i32>> = (0..20).chain((1..19).rev()).map(|x| Point::new(x, 7)).collect();
        let result = GestureClassifier::default().classify_contour(&SelectedContour::new(line));

        assert_eq!(result.fingers, FingerCount::ZERO);
        assert!(matches!(
            result.outcome,
            Outcome::Rejected(ClassifierError::Geometry(_))
        ));
    }
}
