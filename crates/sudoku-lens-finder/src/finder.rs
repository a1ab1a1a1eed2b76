use crate::contour::{find_puzzle_hull, prepare_edges};
use crate::quad::fit_quadrilateral;
use crate::rectify::{rectify_quad, RectifiedPuzzle};
use crate::{FinderParams, GeometryError, Quadrilateral};
use log::debug;
use nalgebra::Point2;
use sudoku_lens_core::{GrayImage, GrayImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Locates the puzzle in successive frames and keeps the latest rectification.
pub struct SudokuFinder {
    params: FinderParams,
    found: Option<RectifiedPuzzle>,
}

impl SudokuFinder {
    pub fn new(params: FinderParams) -> Self {
        Self {
            params,
            found: None,
        }
    }

    #[inline]
    pub fn params(&self) -> &FinderParams {
        &self.params
    }

    #[inline]
    pub fn cell_size(&self) -> usize {
        self.params.cell_size
    }

    #[inline]
    pub fn rectification_size(&self) -> usize {
        self.params.rectification_size()
    }

    /// Run the full geometry chain on one frame without touching `self`.
    ///
    /// Contour → hull → quadrilateral → corner order → rectification.
    pub fn locate(&self, frame: &::image::GrayImage) -> Result<RectifiedPuzzle, GeometryError> {
        let edges = prepare_edges(frame, &self.params);
        let hull = find_puzzle_hull(&edges, &self.params)?;
        let corners = fit_quadrilateral(&hull)?;
        let quad = Quadrilateral::from_corners(corners)?;

        let view = GrayImageView {
            width: frame.width() as usize,
            height: frame.height() as usize,
            data: frame.as_raw(),
        };
        rectify_quad(&view, quad, hull, self.params.cell_size)
    }

    /// Process a frame. Returns whether a puzzle was found.
    ///
    /// Failures are not errors here: the previous result is dropped and the
    /// frame counts as puzzle-absent.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn update_frame(&mut self, frame: &::image::GrayImage) -> bool {
        self.found = match self.locate(frame) {
            Ok(puzzle) => Some(puzzle),
            Err(err) => {
                debug!("puzzle not found: {err}");
                None
            }
        };
        self.found.is_some()
    }

    /// Result of the last frame, if the puzzle was found in it.
    #[inline]
    pub fn found(&self) -> Option<&RectifiedPuzzle> {
        self.found.as_ref()
    }

    pub fn rectified(&self) -> Option<&GrayImage> {
        self.found.as_ref().map(|p| &p.rect)
    }

    pub fn quad(&self) -> Option<&Quadrilateral> {
        self.found.as_ref().map(|p| &p.quad)
    }

    /// Convex hull of the outer contour; empty when not found.
    pub fn hull(&self) -> &[Point2<f32>] {
        self.found.as_ref().map_or(&[], |p| p.hull.as_slice())
    }

    /// Rectified cell image, `None` when out of range or not found.
    pub fn cell(&self, row: usize, col: usize) -> Option<GrayImage> {
        self.found.as_ref()?.cell(row, col)
    }
}
