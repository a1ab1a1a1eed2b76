/// Reasons a frame yields no usable puzzle quadrilateral.
///
/// All variants are non-fatal: the frame is simply treated as puzzle-absent.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("no external contour found")]
    ContourNotFound,
    #[error("largest contour too small (area={area:.1}, min={min_area:.1})")]
    AreaTooSmall { area: f64, min_area: f64 },
    #[error("convex hull has {points} points (need >= 4)")]
    HullTooSmall { points: usize },
    #[error("hull cannot be reduced to a quadrilateral")]
    Degenerate,
    #[error("corners split {top}/{bottom} around the centroid (need 2/2)")]
    UnbalancedCorners { top: usize, bottom: usize },
    #[error("rectifying homography estimation failed")]
    HomographyFailed,
}
