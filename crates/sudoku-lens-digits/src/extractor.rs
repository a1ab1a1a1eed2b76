use crate::flood::{flood_extract, SeedRegion};
use crate::moments::{deskew, recenter};
use crate::threshold::{adaptive_mean_threshold_inv, odd_window};
use crate::ExtractorParams;
use sudoku_lens_core::GrayImage;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Binary ink mask of one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedDigit {
    /// `0`/`255` mask, same size as the input cell.
    pub mask: GrayImage,
    /// `true` when any pixel of `mask` is set.
    pub contains_digit: bool,
}

impl ExtractedDigit {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            mask: GrayImage::new(width, height),
            contains_digit: false,
        }
    }
}

/// Isolates the digit stroke of a rectified cell.
///
/// Stateless between calls: identical input always gives an identical mask.
#[derive(Clone, Debug, Default)]
pub struct DigitExtractor {
    params: ExtractorParams,
}

impl DigitExtractor {
    pub fn new(params: ExtractorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ExtractorParams {
        &self.params
    }

    /// Threshold, flood from the central seed window, then deskew and recenter.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self, cell), fields(w = cell.width, h = cell.height))
    )]
    pub fn extract(&self, cell: &GrayImage) -> ExtractedDigit {
        let (w, h) = (cell.width, cell.height);
        if w == 0 || h == 0 {
            return ExtractedDigit::empty(w, h);
        }

        let window = odd_window(w.max(h));
        let binary = adaptive_mean_threshold_inv(cell, window, self.params.threshold_bias);
        let ink = flood_extract(&binary, SeedRegion::for_cell(w, h));

        if ink.count_nonzero() == 0 {
            return ExtractedDigit {
                mask: ink,
                contains_digit: false,
            };
        }

        let level = self.params.binarize_level;
        let mask = recenter(&deskew(&ink, level), level);
        let contains_digit = mask.count_nonzero() > 0;
        ExtractedDigit {
            mask,
            contains_digit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Paper cell with border lines and an optional dark bar through the middle.
    fn cell(size: usize, with_bar: bool) -> GrayImage {
        let mut img = GrayImage::from_raw(size, size, vec![235; size * size]).expect("sized");
        for i in 0..size {
            for t in 0..2 {
                img.set(i, t, 20);
                img.set(t, i, 20);
            }
        }
        if with_bar {
            let s = size as f32;
            for y in (0.2 * s) as usize..(0.8 * s) as usize {
                for x in (0.4 * s) as usize..(0.6 * s) as usize {
                    img.set(x, y, 25);
                }
            }
        }
        img
    }

    #[test]
    fn bar_is_extracted_without_grid_lines() {
        let out = DigitExtractor::default().extract(&cell(40, true));
        assert!(out.contains_digit);
        // Grid lines on the top/left border are not connected to the bar.
        assert_eq!(out.mask.get(0, 20), 0);
        assert_eq!(out.mask.get(20, 0), 0);
        assert_eq!(out.mask.get(20, 20), 255);
        assert!(out.mask.data.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn blank_cell_has_no_digit() {
        let out = DigitExtractor::default().extract(&cell(40, false));
        assert!(!out.contains_digit);
        assert_eq!(out.mask.count_nonzero(), 0);
        assert_eq!((out.mask.width, out.mask.height), (40, 40));
    }

    #[test]
    fn extraction_is_deterministic() {
        let extractor = DigitExtractor::default();
        let input = cell(40, true);
        let first = extractor.extract(&input);
        let _ = extractor.extract(&cell(40, false));
        let second = extractor.extract(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_image_is_handled() {
        let out = DigitExtractor::default().extract(&GrayImage::new(0, 0));
        assert!(!out.contains_digit);
    }
}
