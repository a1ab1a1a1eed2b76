//! Core types and utilities for sudoku grid reading.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete image decoding crate: frames enter as plain
//! row-major grayscale buffers.

mod homography;
mod image;
mod logger;
mod warp;

pub use homography::{homography_from_4pt, Homography};
pub use image::{sample_bilinear, sample_bilinear_u8, GrayImage, GrayImageView};
pub use warp::{warp_affine_gray, warp_perspective_gray};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

/// Number of cell rows (and columns) in a sudoku grid.
pub const GRID_SIZE: usize = 9;

/// Number of cells in a sudoku grid.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Side of one 3x3 box, in cells.
pub const BOX_SIZE: usize = 3;
