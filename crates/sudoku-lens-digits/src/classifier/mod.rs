//! Digit classifiers behind one capability trait.
//!
//! The concrete variant is chosen once, at construction, from
//! [`ClassifierParams`]; callers only see `Box<dyn DigitClassifier>`.

mod knn;

pub use knn::NearestNeighborClassifier;

use crate::{ExtractedDigit, ExtractorParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use sudoku_lens_core::GrayImage;

/// A raw (un-extracted) cell image with its known digit `1..=9`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledSample {
    pub label: u8,
    pub image: GrayImage,
}

#[derive(thiserror::Error, Debug)]
pub enum ClassifierError {
    #[error("classifier has no trained model")]
    NotTrained,
    #[error("training set is empty or has no usable samples")]
    EmptyTrainingSet,
    #[error("label {label} is not a digit 1..=9")]
    InvalidLabel { label: u8 },
    #[error("model feature size {found} does not match expected {expected}")]
    FeatureSizeMismatch { expected: usize, found: usize },
    #[error("model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ClassifierError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Maps one raw cell image to a digit.
///
/// `classify` never fails: an untrained model, or a cell without ink, reads
/// as `0`. A failing `train` or `load` leaves the previous model untouched.
pub trait DigitClassifier: Send {
    fn classify(&self, cell: &GrayImage) -> u8;

    /// Classify a cell whose ink was already extracted with the extractor
    /// parameters this classifier was built with.
    ///
    /// The default ignores `ink` and classifies the raw cell.
    fn classify_extracted(&self, cell: &GrayImage, ink: &ExtractedDigit) -> u8 {
        let _ = ink;
        self.classify(cell)
    }

    fn train(&mut self, samples: &[LabeledSample]) -> Result<(), ClassifierError>;

    fn load(&mut self, path: &Path) -> Result<(), ClassifierError>;

    fn save(&self, path: &Path) -> Result<(), ClassifierError>;

    fn is_trained(&self) -> bool;
}

/// Which classifier to build and how.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierParams {
    NearestNeighbor {
        /// Neighbours that vote.
        k: usize,
        /// Samples are resized to `sample_width x sample_width` before comparison.
        sample_width: usize,
    },
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self::NearestNeighbor {
            k: 4,
            sample_width: 16,
        }
    }
}

impl ClassifierParams {
    /// Fresh, untrained classifier of the configured kind.
    pub fn build(&self, extractor: ExtractorParams) -> Box<dyn DigitClassifier> {
        match *self {
            Self::NearestNeighbor { k, sample_width } => Box::new(
                NearestNeighborClassifier::new(extractor, k, sample_width),
            ),
        }
    }
}
