//! Convex hull to quadrilateral reduction and canonical corner ordering.

use crate::GeometryError;
use nalgebra::{Point2, Vector2};

/// Four corners in canonical order: top-left, top-right, bottom-right, bottom-left.
///
/// The order is established by [`Quadrilateral::from_corners`] and cannot be
/// changed afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quadrilateral {
    corners: [Point2<f32>; 4],
}

impl Quadrilateral {
    /// Order four arbitrary corners as TL, TR, BR, BL.
    ///
    /// Points strictly above the centroid form the top pair, the rest the
    /// bottom pair; each pair is then ordered by ascending x. Anything other
    /// than a 2/2 split is rejected.
    pub fn from_corners(points: [Point2<f32>; 4]) -> Result<Self, GeometryError> {
        let cy = points.iter().map(|p| p.y).sum::<f32>() / 4.0;

        let (mut top, mut bottom): (Vec<&Point2<f32>>, Vec<&Point2<f32>>) =
            points.iter().partition(|p| p.y < cy);
        if top.len() != 2 {
            return Err(GeometryError::UnbalancedCorners {
                top: top.len(),
                bottom: bottom.len(),
            });
        }
        top.sort_by(|a, b| a.x.total_cmp(&b.x));
        bottom.sort_by(|a, b| a.x.total_cmp(&b.x));

        Ok(Self {
            corners: [*top[0], *top[1], *bottom[1], *bottom[0]],
        })
    }

    /// Corners as TL, TR, BR, BL.
    #[inline]
    pub fn corners(&self) -> &[Point2<f32>; 4] {
        &self.corners
    }

    pub fn top_left(&self) -> Point2<f32> {
        self.corners[0]
    }

    pub fn top_right(&self) -> Point2<f32> {
        self.corners[1]
    }

    pub fn bottom_right(&self) -> Point2<f32> {
        self.corners[2]
    }

    pub fn bottom_left(&self) -> Point2<f32> {
        self.corners[3]
    }
}

/// Intersection of the infinite lines `(a, b)` and `(c, d)`.
///
/// Returns `None` for parallel lines.
pub fn line_intersection(
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
) -> Option<Point2<f64>> {
    let r = b - a;
    let s = d - c;
    let denom = cross(r, s);
    if denom == 0.0 {
        return None;
    }
    let t = cross(c - a, s) / denom;
    let p = a + r * t;
    (p.x.is_finite() && p.y.is_finite()).then_some(p)
}

/// Area of the triangle spanned by two vectors from a common apex.
#[inline]
pub fn triangle_area(u: Vector2<f64>, v: Vector2<f64>) -> f64 {
    cross(u, v).abs() * 0.5
}

#[inline]
fn cross(u: Vector2<f64>, v: Vector2<f64>) -> f64 {
    u.x * v.y - u.y * v.x
}

/// Reduce a convex hull to four corners.
///
/// Each round looks at every window of four consecutive points `(a, b, c, d)`
/// and intersects line `ab` with line `cd`. The window whose triangle
/// `(intersection, b, c)` is smallest gets `b` and `c` replaced by the
/// intersection; the first window wins ties. Windows with parallel lines are
/// skipped.
pub fn fit_quadrilateral(hull: &[Point2<f32>]) -> Result<[Point2<f32>; 4], GeometryError> {
    if hull.len() < 4 {
        return Err(GeometryError::HullTooSmall { points: hull.len() });
    }

    let mut poly: Vec<Point2<f64>> = hull.iter().map(|p| p.cast::<f64>()).collect();

    while poly.len() > 4 {
        let n = poly.len();
        let mut best: Option<(usize, Point2<f64>, f64)> = None;

        for i in 0..n {
            let [a, b, c, d] = [0, 1, 2, 3].map(|k| poly[(i + k) % n]);
            let Some(x) = line_intersection(a, b, c, d) else {
                continue;
            };
            let area = triangle_area(b - x, c - x);
            if !area.is_finite() {
                continue;
            }
            if best.map_or(true, |(_, _, min)| area < min) {
                best = Some((i, x, area));
            }
        }

        let (i, x, _) = best.ok_or(GeometryError::Degenerate)?;
        let ib = (i + 1) % n;
        let ic = (i + 2) % n;
        poly[ib] = x;
        poly.remove(ic);
    }

    let p = |k: usize| poly[k].cast::<f32>();
    Ok([p(0), p(1), p(2), p(3)])
}

/// Shoelace area of a closed polygon (closing edge implied).
pub fn polygon_area(points: &[Point2<f64>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let p = points[i];
            let q = points[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum();
    twice.abs() * 0.5
}
