use serde::{Deserialize, Serialize};

/// Parameters of the per-cell ink extractor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorParams {
    /// Pixels darker than the local mean by at least this much are ink.
    pub threshold_bias: i32,
    /// Level used to re-binarize the mask after each affine resample.
    pub binarize_level: u8,
}

impl Default for ExtractorParams {
    fn default() -> Self {
        Self {
            threshold_bias: 10,
            binarize_level: 128,
        }
    }
}
