use geo::Area;
use geo_types::{Coord, LineString, Polygon};
use imageproc::contours::find_contours;
use imageproc::point::Point;

use crate::config::ClassifierConfig;
use crate::frame::BinaryMask;

/// The one contour per frame that is taken to be the hand.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedContour {
    pub points: Vec<Point<i32>>,
    /// Enclosed area in square pixels.
    pub area: f64,
}

impl SelectedContour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        let area = contour_area(&points);
        Self { points, area }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Area enclosed by a closed pixel boundary (shoelace over pixel centres).
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    let ring: LineString<f64> = points
        .iter()
        .map(|p| Coord {
            x: f64::from(p.x),
            y: f64::from(p.y),
        })
        .collect();
    Polygon::new(ring, vec![]).unsigned_area()
}

/// Pick the largest contour in the mask whose area exceeds the minimum.
///
/// Ties keep the contour found first. An empty mask, or one holding only
/// specks, yields `None`; that is the usual answer when no hand is in view.
pub fn select_contour(mask: &BinaryMask, config: &ClassifierConfig) -> Option<SelectedContour> {
    let _span = tracing::debug_span!("select_contour").entered();

    let candidates = find_contours::<i32>(mask);
    let total = candidates.len();

    let mut best: Option<SelectedContour> = None;
    for contour in candidates {
        if contour.points.len() < config.min_contour_points {
            continue;
        }

        let area = contour_area(&contour.points);
        if area <= config.min_contour_area {
            continue;
        }

        if best.as_ref().map_or(true, |b| area > b.area) {
            best = Some(SelectedContour {
                points: contour.points,
                area,
            });
        }
    }

    match &best {
        Some(selected) => tracing::debug!(
            "Selected contour with {} points, area {:.1} (of {} candidates)",
            selected.len(),
            selected.area,
            total
        ),
        None => tracing::debug!("No contour above minimum area (of {} candidates)", total),
    }

    best
}
