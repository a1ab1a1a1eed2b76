use crate::{DigitExtractor, ExtractedDigit};
use sudoku_lens_core::{GrayImage, CELL_COUNT, GRID_SIZE};
use sudoku_lens_finder::RectifiedPuzzle;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Per-cell crops and extraction results for the current rectified puzzle.
///
/// Row-major, `row * 9 + col`. Empty until the first [`GridDigits::update`]
/// and again after [`GridDigits::clear`].
#[derive(Clone, Debug, Default)]
pub struct GridDigits {
    cells: Vec<GrayImage>,
    digits: Vec<ExtractedDigit>,
}

impl GridDigits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crop and extract all 81 cells of `puzzle`.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    pub fn update(&mut self, extractor: &DigitExtractor, puzzle: &RectifiedPuzzle) {
        self.clear();
        self.cells.reserve(CELL_COUNT);
        self.digits.reserve(CELL_COUNT);

        let s = puzzle.cell_size;
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let cell = puzzle
                    .cell(row, col)
                    .unwrap_or_else(|| GrayImage::new(s, s));
                self.digits.push(extractor.extract(&cell));
                self.cells.push(cell);
            }
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.digits.clear();
    }

    #[inline]
    pub fn is_prepared(&self) -> bool {
        self.digits.len() == CELL_COUNT
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (self.is_prepared() && row < GRID_SIZE && col < GRID_SIZE).then_some(row * GRID_SIZE + col)
    }

    /// Rectified image of one cell.
    pub fn cell(&self, row: usize, col: usize) -> Option<&GrayImage> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    pub fn extracted(&self, row: usize, col: usize) -> Option<&ExtractedDigit> {
        self.index(row, col).map(|i| &self.digits[i])
    }

    pub fn mask(&self, row: usize, col: usize) -> Option<&GrayImage> {
        self.extracted(row, col).map(|d| &d.mask)
    }

    /// `false` for out-of-range cells and when nothing is prepared.
    pub fn contains_digit(&self, row: usize, col: usize) -> bool {
        self.extracted(row, col).is_some_and(|d| d.contains_digit)
    }
}
