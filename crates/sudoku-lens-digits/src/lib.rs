//! Digit ink extraction and classification for rectified sudoku cells.
//!
//! [`DigitExtractor`] turns one cell into a binary ink mask:
//! 1. inverted adaptive mean threshold over a window the size of the cell,
//! 2. 8-connected flood from a small seed window at the cell centre, so
//!    grid lines touching the border are left out,
//! 3. shear deskew from second-order moments and recentering on the centre of
//!    mass.
//!
//! [`GridDigits`] applies it to all 81 cells of a
//! [`sudoku_lens_finder::RectifiedPuzzle`]. Classification sits behind the
//! [`DigitClassifier`] trait.

mod classifier;
mod extractor;
mod flood;
mod grid;
mod moments;
mod params;
mod threshold;

pub use classifier::{
    ClassifierError, ClassifierParams, DigitClassifier, LabeledSample, NearestNeighborClassifier,
};
pub use extractor::{DigitExtractor, ExtractedDigit};
pub use flood::{flood_extract, SeedRegion};
pub use grid::GridDigits;
pub use moments::{binarize, deskew, recenter, Moments};
pub use params::ExtractorParams;
pub use threshold::{adaptive_mean_threshold_inv, odd_window};
