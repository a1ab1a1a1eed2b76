use crate::{ConsensusTracker, PipelineConfig, TrackState, TrackerEvent};
use log::{info, warn};
use nalgebra::Point2;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use sudoku_lens_core::{GrayImage, GRID_SIZE};
use sudoku_lens_digits::{DigitClassifier, DigitExtractor, GridDigits, LabeledSample};
use sudoku_lens_finder::{Quadrilateral, SudokuFinder};
use sudoku_lens_solver::{solve_grid, Grid};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Result of one [`SudokuPipeline::update_frame`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub found: bool,
    pub events: Vec<TrackerEvent>,
}

/// Consistent copy of the per-frame state, taken under the frame lock.
#[derive(Clone, Debug, Default)]
pub struct PipelineSnapshot {
    pub found: bool,
    pub rectified: Option<GrayImage>,
    pub hull: Vec<Point2<f32>>,
    pub quad: Option<Quadrilateral>,
    /// Row-major ink masks; empty when the puzzle is not found.
    pub masks: Vec<GrayImage>,
    pub contains_digit: [[bool; GRID_SIZE]; GRID_SIZE],
    pub digits: Grid,
    pub fixed: [[bool; GRID_SIZE]; GRID_SIZE],
    pub state: TrackState,
}

struct FrameState {
    finder: SudokuFinder,
    digits: GridDigits,
    tracker: ConsensusTracker,
}

/// Finder, extractor, classifier and tracker behind two locks.
///
/// The frame lock covers one whole update cycle, so readers never see a half
/// updated frame. The model lock is separate: a new classifier is trained or
/// loaded without holding it and then swapped in, so each frame sees either
/// the old or the new model.
pub struct SudokuPipeline {
    config: PipelineConfig,
    extractor: DigitExtractor,
    frame: Mutex<FrameState>,
    model: Mutex<Box<dyn DigitClassifier>>,
}

fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SudokuPipeline {
    /// Pipeline with an untrained classifier of the configured kind.
    pub fn new(config: PipelineConfig) -> Self {
        let classifier = config.classifier.build(config.extractor.clone());
        Self::with_classifier(config, classifier)
    }

    pub fn with_classifier(config: PipelineConfig, classifier: Box<dyn DigitClassifier>) -> Self {
        let frame = FrameState {
            finder: SudokuFinder::new(config.finder.clone()),
            digits: GridDigits::new(),
            tracker: ConsensusTracker::new(config.tracker.clone()),
        };
        Self {
            extractor: DigitExtractor::new(config.extractor.clone()),
            config,
            frame: Mutex::new(frame),
            model: Mutex::new(classifier),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one frame through finder, extractor, classifier and tracker.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn update_frame(&self, frame: &::image::GrayImage) -> FrameOutcome {
        let mut guard = lock(&self.frame);
        let state = &mut *guard;

        if !state.finder.update_frame(frame) {
            state.digits.clear();
            return FrameOutcome {
                found: false,
                events: state.tracker.frame_lost(),
            };
        }

        if let Some(puzzle) = state.finder.found() {
            state.digits.update(&self.extractor, puzzle);
        }

        let model = lock(&self.model);
        let events = if model.is_trained() {
            let digits = &state.digits;
            // Masks are reused from this frame's extraction.
            let mut classify = |row: usize, col: usize| {
                match (digits.cell(row, col), digits.extracted(row, col)) {
                    (Some(cell), Some(ink)) if ink.contains_digit => {
                        model.classify_extracted(cell, ink)
                    }
                    _ => 0,
                }
            };
            state.tracker.frame_found(Some(&mut classify))
        } else {
            state.tracker.frame_found(None)
        };

        FrameOutcome {
            found: true,
            events,
        }
    }

    /// Colour frames are reduced to luma first.
    pub fn update_frame_dynamic(&self, frame: &::image::DynamicImage) -> FrameOutcome {
        self.update_frame(&frame.to_luma8())
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        let state = lock(&self.frame);
        let found = state.finder.found().is_some();

        let mut contains_digit = [[false; GRID_SIZE]; GRID_SIZE];
        let mut masks = Vec::new();
        if found {
            for (row, line) in contains_digit.iter_mut().enumerate() {
                for (col, flag) in line.iter_mut().enumerate() {
                    *flag = state.digits.contains_digit(row, col);
                    if let Some(mask) = state.digits.mask(row, col) {
                        masks.push(mask.clone());
                    }
                }
            }
        }

        PipelineSnapshot {
            found,
            rectified: state.finder.rectified().cloned(),
            hull: state.finder.hull().to_vec(),
            quad: state.finder.quad().copied(),
            masks,
            contains_digit,
            digits: state.tracker.current_grid(),
            fixed: state.tracker.fixed_mask(),
            state: state.tracker.state(),
        }
    }

    pub fn rectified(&self) -> Option<GrayImage> {
        lock(&self.frame).finder.rectified().cloned()
    }

    pub fn cell_mask(&self, row: usize, col: usize) -> Option<GrayImage> {
        lock(&self.frame).digits.mask(row, col).cloned()
    }

    pub fn contains_digit(&self, row: usize, col: usize) -> bool {
        lock(&self.frame).digits.contains_digit(row, col)
    }

    /// Committed grid once every cell is fixed.
    pub fn fixed_grid(&self) -> Option<Grid> {
        lock(&self.frame).tracker.fixed_grid()
    }

    pub fn track_state(&self) -> TrackState {
        lock(&self.frame).tracker.state()
    }

    pub fn has_model(&self) -> bool {
        lock(&self.model).is_trained()
    }

    /// Replace the classifier outright.
    pub fn set_classifier(&self, classifier: Box<dyn DigitClassifier>) {
        *lock(&self.model) = classifier;
    }

    /// Train a fresh model and swap it in. On failure the old model stays.
    pub fn train(&self, samples: &[LabeledSample]) -> bool {
        let mut fresh = self.config.classifier.build(self.config.extractor.clone());
        match fresh.train(samples) {
            Ok(()) => {
                self.set_classifier(fresh);
                info!("classifier trained on {} samples", samples.len());
                true
            }
            Err(err) => {
                warn!("training failed: {err}");
                false
            }
        }
    }

    /// Load a model from disk and swap it in. On failure the old model stays.
    pub fn load(&self, path: &Path) -> bool {
        let mut fresh = self.config.classifier.build(self.config.extractor.clone());
        match fresh.load(path) {
            Ok(()) => {
                self.set_classifier(fresh);
                info!("classifier loaded from {}", path.display());
                true
            }
            Err(err) => {
                warn!("loading classifier failed: {err}");
                false
            }
        }
    }

    pub fn save(&self, path: &Path) -> bool {
        match lock(&self.model).save(path) {
            Ok(()) => true,
            Err(err) => {
                warn!("saving classifier failed: {err}");
                false
            }
        }
    }

    /// Status form of the solver: completed grid and `true`, or the input and `false`.
    pub fn solve(&self, grid: &Grid) -> (Grid, bool) {
        solve_grid(grid)
    }
}
