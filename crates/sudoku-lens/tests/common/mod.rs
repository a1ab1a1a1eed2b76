#![allow(dead_code)]

use image::{GrayImage, Luma};
use std::path::Path;
use sudoku_lens::core::GrayImage as CoreImage;
use sudoku_lens::digits::{ClassifierError, DigitClassifier, LabeledSample};

#[path = "../../../sudoku-lens-finder/tests/common/mod.rs"]
mod synthetic;

pub use synthetic::{tilted_corners, SyntheticPuzzle};

pub fn puzzle_frame(inked: &[(usize, usize)]) -> GrayImage {
    SyntheticPuzzle {
        corners: tilted_corners(),
        inked: inked.to_vec(),
    }
    .render(480, 480)
}

pub fn blank_frame() -> GrayImage {
    GrayImage::from_pixel(480, 480, Luma([255]))
}

/// Reads every inked cell as the same digit.
pub struct ConstantClassifier(pub u8);

impl DigitClassifier for ConstantClassifier {
    fn classify(&self, _cell: &CoreImage) -> u8 {
        self.0
    }

    fn train(&mut self, _samples: &[LabeledSample]) -> Result<(), ClassifierError> {
        Ok(())
    }

    fn load(&mut self, _path: &Path) -> Result<(), ClassifierError> {
        Err(ClassifierError::NotTrained)
    }

    fn save(&self, _path: &Path) -> Result<(), ClassifierError> {
        Err(ClassifierError::NotTrained)
    }

    fn is_trained(&self) -> bool {
        true
    }
}
