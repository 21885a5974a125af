use std::f64::consts::FRAC_PI_2;

/// Fixed constants for the per-frame classifier.
///
/// These are chosen once per run. Nothing in the pipeline adapts them to the
/// content of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Gaussian blur sigma. 1.1 matches a 5x5 kernel with automatic sigma.
    /// A value of zero or less disables smoothing.
    pub blur_sigma: f32,
    /// Intensity cut for the inverted threshold: pixels above it become
    /// background, everything else foreground.
    pub threshold: u8,
    /// Contours must enclose strictly more than this many square pixels.
    pub min_contour_area: f64,
    /// Contours with fewer points are never candidates.
    pub min_contour_points: usize,
    /// Concavities at or below this depth (pixels) are not reported as defects.
    pub min_defect_depth: f64,
    /// A defect counts as a finger gap when its angle is strictly below this.
    pub max_gap_angle: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            threshold: 60,
            min_contour_area: 100.0,
            min_contour_points: 3,
            min_defect_depth: 1.0,
            max_gap_angle: FRAC_PI_2,
        }
    }
}
