use imageproc::point::Point;

use super::hull::Defect;

/// Number of extended fingers seen in one frame, always within `0..=5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FingerCount(u8);

impl FingerCount {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(5);

    /// Saturates anything above five: more gaps than that is contour noise.
    pub fn saturating(count: usize) -> Self {
        Self(count.min(Self::MAX.0 as usize) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for FingerCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn distance(p: Point<i32>, q: Point<i32>) -> f64 {
    f64::from(p.x - q.x).hypot(f64::from(p.y - q.y))
}

/// Angle at `far` in the triangle `(start, end, far)`, in radians.
///
/// Uses the law of cosines with the cosine clamped to `[-1, 1]`. Returns
/// `None` when `far` coincides with either other vertex.
pub fn gap_angle(start: Point<i32>, end: Point<i32>, far: Point<i32>) -> Option<f64> {
    let a = distance(start, end);
    let b = distance(start, far);
    let c = distance(end, far);

    if b == 0.0 || c == 0.0 {
        return None;
    }

    let cosine = ((b * b + c * c - a * a) / (2.0 * b * c)).clamp(-1.0, 1.0);
    Some(cosine.acos())
}

/// Count defects whose angle at the far point is strictly below `max_angle`.
///
/// Defects that reference points outside the contour, or whose triangle is
/// degenerate, do not count.
pub fn count_fingers(contour: &[Point<i32>], defects: &[Defect], max_angle: f64) -> FingerCount {
    let _span = tracing::debug_span!("count_fingers").entered();

    let gaps = defects
        .iter()
        .filter(|defect| {
            let (Some(&start), Some(&end), Some(&far)) = (
                contour.get(defect.start),
                contour.get(defect.end),
                contour.get(defect.far),
            ) else {
                return false;
            };
            gap_angle(start, end, far).map_or(false, |angle| angle < max_angle)
        })
        .count();

    FingerCount::saturating(gaps)
}
