//! Sudoku grid finder: locates the puzzle in a frame and rectifies it.
//!
//! ## Quickstart
//!
//! ```
//! use sudoku_lens_finder::{FinderParams, SudokuFinder};
//!
//! let mut finder = SudokuFinder::new(FinderParams::default());
//! let frame = image::GrayImage::new(320, 240);
//! let found = finder.update_frame(&frame);
//! assert!(!found);
//! ```
//!
//! Algorithm:
//! 1. Box blur, Canny edges, small dilation to close gaps.
//! 2. Keep the largest external contour, reject it below `min_contour_area`.
//! 3. Take its convex hull and reduce it to four corners by repeatedly
//!    merging two consecutive hull points into the intersection of their
//!    neighbouring edges, picking the merge that adds the least area.
//! 4. Order the corners TL, TR, BR, BL around their centroid.
//! 5. Solve the 4-point homography onto a `9 * cell_size` square and warp.

mod contour;
mod error;
mod finder;
mod params;
mod quad;
mod rectify;

pub use contour::{find_puzzle_hull, prepare_edges};
pub use error::GeometryError;
pub use finder::SudokuFinder;
pub use params::FinderParams;
pub use quad::{fit_quadrilateral, line_intersection, polygon_area, triangle_area, Quadrilateral};
pub use rectify::{canonical_square, rectify_quad, RectifiedPuzzle};
