//! Edge map preparation and outer puzzle contour search.

use crate::quad::polygon_area;
use crate::{FinderParams, GeometryError};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::box_filter;
use imageproc::geometry::convex_hull;
use imageproc::morphology::dilate;
use nalgebra::Point2;

/// Blur, detect edges and optionally close small gaps in them.
pub fn prepare_edges(frame: &GrayImage, params: &FinderParams) -> GrayImage {
    let blurred = if params.blur_radius > 0 {
        box_filter(frame, params.blur_radius, params.blur_radius)
    } else {
        frame.clone()
    };
    let edges = canny(&blurred, params.canny_low, params.canny_high);
    if params.edge_dilation > 0 {
        dilate(&edges, Norm::LInf, params.edge_dilation)
    } else {
        edges
    }
}

/// Pick the largest external contour of the edge map and return its convex hull.
///
/// Ties in area go to the contour found last.
pub fn find_puzzle_hull(
    edges: &GrayImage,
    params: &FinderParams,
) -> Result<Vec<Point2<f32>>, GeometryError> {
    let contours = find_contours::<i32>(edges);

    let mut best: Option<(f64, usize)> = None;
    for (idx, contour) in contours.iter().enumerate() {
        if contour.border_type != BorderType::Outer || contour.parent.is_some() {
            continue;
        }
        let pts: Vec<Point2<f64>> = contour
            .points
            .iter()
            .map(|p| Point2::new(p.x as f64, p.y as f64))
            .collect();
        let area = polygon_area(&pts);
        if best.map_or(true, |(max, _)| area >= max) {
            best = Some((area, idx));
        }
    }

    let (area, idx) = best.ok_or(GeometryError::ContourNotFound)?;
    if area < params.min_contour_area {
        return Err(GeometryError::AreaTooSmall {
            area,
            min_area: params.min_contour_area,
        });
    }

    let hull = convex_hull(contours[idx].points.as_slice());
    if hull.len() < 4 {
        return Err(GeometryError::HullTooSmall { points: hull.len() });
    }

    Ok(hull
        .iter()
        .map(|p| Point2::new(p.x as f32, p.y as f32))
        .collect())
}
