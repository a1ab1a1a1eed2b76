//! Facade crate for the `sudoku-lens-*` workspace.
//!
//! This crate provides:
//! - re-exports of the finder, digit and solver crates,
//! - [`ConsensusTracker`], which turns noisy per-frame readings into fixed digits,
//! - [`SudokuPipeline`], the locked per-frame cycle shared with readers,
//! - [`PipelineWorker`] and [`FrameSource`]s to drive it from a thread,
//! - [`PipelineConfig`], a JSON config covering all stages.
//!
//! ## Quickstart
//!
//! ```no_run
//! use std::sync::Arc;
//! use sudoku_lens::{ImageSequenceSource, PipelineConfig, PipelineEvent, PipelineWorker, SudokuPipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Arc::new(SudokuPipeline::new(PipelineConfig::default()));
//! pipeline.load(std::path::Path::new("digits.json"));
//!
//! let source = ImageSequenceSource::new(["f0.png".into(), "f1.png".into()]);
//! let worker = PipelineWorker::spawn(Arc::clone(&pipeline), source);
//! for event in worker.events() {
//!     if let PipelineEvent::Solved { solution, .. } = event {
//!         print!("{solution}");
//!     }
//! }
//! worker.join()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `sudoku_lens::core`: gray images, homographies, warps, logger.
//! - `sudoku_lens::finder`: contour search, quadrilateral fit, rectification.
//! - `sudoku_lens::digits`: ink extraction and classifiers.
//! - `sudoku_lens::solver`: `Grid` and the backtracking solver.

pub use sudoku_lens_core as core;
pub use sudoku_lens_digits as digits;
pub use sudoku_lens_finder as finder;
pub use sudoku_lens_solver as solver;

pub use sudoku_lens_digits::{ClassifierParams, DigitClassifier, ExtractorParams, LabeledSample};
pub use sudoku_lens_finder::FinderParams;
pub use sudoku_lens_solver::Grid;

mod config;
mod pipeline;
mod source;
mod tracker;
mod worker;

pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{FrameOutcome, PipelineSnapshot, SudokuPipeline};
pub use source::{FrameSource, ImageSequenceSource, LatestFrameSlot};
pub use tracker::{
    CellState, ConsensusTracker, PuzzleTrackState, TrackState, TrackerEvent, TrackerParams,
};
pub use worker::{PipelineEvent, PipelineWorker, WorkerError, WorkerStats};

pub use sudoku_lens_core::init_with_level;

/// Install the `tracing` fmt subscriber and route `log` records into it.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    sudoku_lens_core::init_tracing(json);
    let _ = tracing_log::LogTracer::init();
}
