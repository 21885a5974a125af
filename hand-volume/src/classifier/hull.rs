use std::collections::HashSet;

use imageproc::point::Point;

use crate::error::GeometryError;

use super::contour::SelectedContour;

/// Convex hull of a contour, as indices into its point sequence.
///
/// Indices are strictly increasing, so consecutive entries (wrapping at the
/// end) bound one stretch of the contour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvexHull {
    indices: Vec<usize>,
}

impl ConvexHull {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// A concavity between two consecutive hull vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Defect {
    pub start: usize,
    pub end: usize,
    /// Contour point farthest from the hull edge `start -> end`.
    pub far: usize,
    /// Perpendicular distance of `far` from that edge, in pixels.
    pub depth: f64,
}

/// Compute the hull and its convexity defects in one step.
pub fn analyze(
    contour: &SelectedContour,
    min_depth: f64,
) -> Result<(ConvexHull, Vec<Defect>), GeometryError> {
    let _span = tracing::debug_span!("analyze").entered();

    let hull = convex_hull(&contour.points)?;
    let defects = convexity_defects(&contour.points, &hull, min_depth)?;

    tracing::debug!(
        "Hull of {} vertices, {} defects deeper than {:.1}px",
        hull.len(),
        defects.len(),
        min_depth
    );

    Ok((hull, defects))
}

/// Convex hull of a contour, mapped back to contour indices.
///
/// Fails when fewer than three distinct hull points remain or they are all
/// collinear.
pub fn convex_hull(points: &[Point<i32>]) -> Result<ConvexHull, GeometryError> {
    if points.is_empty() {
        return Err(GeometryError::EmptyContour);
    }

    let mut remaining: HashSet<(i32, i32)> = imageproc::geometry::convex_hull(points)
        .into_iter()
        .map(|p| (p.x, p.y))
        .collect();

    // First occurrence of each hull vertex, in contour order.
    let mut indices = Vec::with_capacity(remaining.len());
    for (index, point) in points.iter().enumerate() {
        if remaining.remove(&(point.x, point.y)) {
            indices.push(index);
        }
    }

    if indices.len() < 3 || is_collinear(points, &indices) {
        return Err(GeometryError::DegenerateHull {
            points: indices.len(),
        });
    }

    Ok(ConvexHull { indices })
}

fn is_collinear(points: &[Point<i32>], indices: &[usize]) -> bool {
    let origin = points[indices[0]];
    let reference = points[indices[1]];
    indices[2..].iter().all(|&i| cross(origin, reference, points[i]) == 0)
}

fn cross(o: Point<i32>, a: Point<i32>, b: Point<i32>) -> i64 {
    let (ax, ay) = (i64::from(a.x - o.x), i64::from(a.y - o.y));
    let (bx, by) = (i64::from(b.x - o.x), i64::from(b.y - o.y));
    ax * by - ay * bx
}

/// Concavities between each pair of consecutive hull vertices.
///
/// For every hull edge, the contour points strictly between its two vertices
/// are scanned for the one farthest from the edge. A defect is reported when
/// that distance is greater than `min_depth`.
pub fn convexity_defects(
    points: &[Point<i32>],
    hull: &ConvexHull,
    min_depth: f64,
) -> Result<Vec<Defect>, GeometryError> {
    let len = points.len();
    let indices = hull.indices();

    if indices.len() < 3 {
        return Err(GeometryError::DegenerateHull {
            points: indices.len(),
        });
    }
    if let Some(&index) = indices.iter().find(|&&i| i >= len) {
        return Err(GeometryError::IndexOutOfRange { index, len });
    }

    let mut defects = Vec::new();
    for (k, &start) in indices.iter().enumerate() {
        let end = indices[(k + 1) % indices.len()];

        let between = if end > start {
            (start + 1..end).chain(0..0)
        } else {
            (start + 1..len).chain(0..end)
        };

        let mut deepest: Option<(usize, f64)> = None;
        for far in between {
            let depth = distance_to_edge(points[far], points[start], points[end]);
            if deepest.map_or(true, |(_, d)| depth > d) {
                deepest = Some((far, depth));
            }
        }

        if let Some((far, depth)) = deepest {
            if depth > min_depth {
                defects.push(Defect {
                    start,
                    end,
                    far,
                    depth,
                });
            }
        }
    }

    Ok(defects)
}

fn distance_to_edge(p: Point<i32>, a: Point<i32>, b: Point<i32>) -> f64 {
    let (dx, dy) = (f64::from(b.x - a.x), f64::from(b.y - a.y));
    let length = dx.hypot(dy);
    let (px, py) = (f64::from(p.x - a.x), f64::from(p.y - a.y));

    if length == 0.0 {
        return px.hypot(py);
    }
    (dx * py - dy * px).abs() / length
}
