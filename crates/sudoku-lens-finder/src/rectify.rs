use crate::{GeometryError, Quadrilateral};
use nalgebra::Point2;
use sudoku_lens_core::{
    homography_from_4pt, warp_perspective_gray, GrayImage, GrayImageView, Homography, GRID_SIZE,
};

/// A located puzzle: the hull it came from, its ordered corners, the
/// rectifying transform and the top-down image.
///
/// Rebuilt from scratch on every frame in which the puzzle is found.
#[derive(Clone, Debug)]
pub struct RectifiedPuzzle {
    pub hull: Vec<Point2<f32>>,
    pub quad: Quadrilateral,
    /// Maps frame pixels onto the canonical square.
    pub h_rect_from_img: Homography,
    /// Maps canonical square pixels back into the frame.
    pub h_img_from_rect: Homography,
    pub rect: GrayImage,
    pub cell_size: usize,
}

impl RectifiedPuzzle {
    /// Copy of the `cell_size` square at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<GrayImage> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return None;
        }
        let s = self.cell_size;
        self.rect.view().crop(col * s, row * s, s, s)
    }

    /// Frame-space corners of cell `(row, col)` as TL, TR, BR, BL.
    pub fn cell_corners_img(&self, row: usize, col: usize) -> Option<[Point2<f32>; 4]> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return None;
        }
        let s = self.cell_size as f32;
        let (x0, y0) = (col as f32 * s, row as f32 * s);
        Some(
            [
                Point2::new(x0, y0),
                Point2::new(x0 + s, y0),
                Point2::new(x0 + s, y0 + s),
                Point2::new(x0, y0 + s),
            ]
            .map(|p| self.h_img_from_rect.apply(p)),
        )
    }
}

/// Corners of the canonical `side x side` square, TL, TR, BR, BL.
pub fn canonical_square(side: usize) -> [Point2<f32>; 4] {
    let s = side as f32;
    [
        Point2::new(0.0, 0.0),
        Point2::new(s, 0.0),
        Point2::new(s, s),
        Point2::new(0.0, s),
    ]
}

/// Warp the frame so that `quad` becomes a `9 * cell_size` square.
pub fn rectify_quad(
    frame: &GrayImageView<'_>,
    quad: Quadrilateral,
    hull: Vec<Point2<f32>>,
    cell_size: usize,
) -> Result<RectifiedPuzzle, GeometryError> {
    let side = cell_size * GRID_SIZE;
    let square = canonical_square(side);

    let h_img_from_rect =
        homography_from_4pt(&square, quad.corners()).ok_or(GeometryError::HomographyFailed)?;
    let h_rect_from_img = h_img_from_rect
        .inverse()
        .ok_or(GeometryError::HomographyFailed)?;

    let rect = warp_perspective_gray(frame, h_img_from_rect, side, side);

    Ok(RectifiedPuzzle {
        hull,
        quad,
        h_rect_from_img,
        h_img_from_rect,
        rect,
        cell_size,
    })
}
