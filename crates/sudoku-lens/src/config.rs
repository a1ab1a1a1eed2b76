//! JSON configuration for the whole pipeline.

use crate::TrackerParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use sudoku_lens_digits::{ClassifierParams, ExtractorParams};
use sudoku_lens_finder::FinderParams;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Parameters of every stage. Missing sections and fields take their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub finder: FinderParams,
    pub extractor: ExtractorParams,
    pub classifier: ClassifierParams,
    pub tracker: TrackerParams,
}

impl PipelineConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.finder.cell_size, 40);
        assert_eq!(cfg.finder.min_contour_area, 1000.0);
        assert_eq!(cfg.extractor.threshold_bias, 10);
        assert_eq!(cfg.tracker.fix_window, 15);
        assert_eq!(cfg.tracker.lost_frames, 10);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: PipelineConfig =
            serde_json::from_str(r#"{ "finder": { "cell_size": 28 }, "tracker": { "lost_frames": 3 } }"#)
                .expect("valid json");
        assert_eq!(cfg.finder.cell_size, 28);
        assert_eq!(cfg.finder.canny_high, 80.0);
        assert_eq!(cfg.tracker.lost_frames, 3);
        assert_eq!(cfg.tracker.fix_window, 15);
        assert_eq!(cfg.classifier, ClassifierParams::default());
    }

    #[test]
    fn written_config_reads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pipeline.json");
        let mut cfg = PipelineConfig::default();
        cfg.finder.edge_dilation = 0;
        cfg.classifier = ClassifierParams::NearestNeighbor {
            k: 1,
            sample_width: 12,
        };
        cfg.write_json(&path).expect("written");
        assert_eq!(PipelineConfig::load_json(&path).expect("read"), cfg);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PipelineConfig::load_json("/definitely/not/here.json").expect_err("missing");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
