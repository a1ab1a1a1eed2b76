//! Temporal consensus over per-frame digit readings.
//!
//! Two levels of state:
//! - puzzle: `Absent` / `Tracking`, with a miss counter so a few frames
//!   without a quadrilateral do not drop the puzzle,
//! - cell: a ring buffer of the last `fix_window` readings; a cell fixes once
//!   the buffer is full and unanimous, and is frozen from then on.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use sudoku_lens_core::{CELL_COUNT, GRID_SIZE};
use sudoku_lens_solver::Grid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    /// Consecutive identical readings needed to fix a cell.
    pub fix_window: usize,
    /// Consecutive frames without the puzzle before it counts as gone.
    pub lost_frames: usize,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            fix_window: 15,
            lost_frames: 10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerEvent {
    PuzzleAppeared,
    PuzzleDisappeared,
    CellDigitChanged { row: usize, col: usize, digit: u8 },
    CellDigitFixed { row: usize, col: usize, digit: u8 },
    AllDigitsFixed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackState {
    #[default]
    Absent,
    Tracking,
}

/// Reading history of one cell.
#[derive(Clone, Debug)]
pub struct CellState {
    history: Vec<u8>,
    head: usize,
    filled: usize,
    last: u8,
    fixed: Option<u8>,
}

impl CellState {
    fn new(window: usize) -> Self {
        Self {
            history: vec![0; window.max(1)],
            head: 0,
            filled: 0,
            last: 0,
            fixed: None,
        }
    }

    fn push(&mut self, digit: u8) {
        self.history[self.head] = digit;
        self.head = (self.head + 1) % self.history.len();
        self.filled = (self.filled + 1).min(self.history.len());
        self.last = digit;
    }

    /// The common value of a full, unanimous window.
    fn unanimous(&self) -> Option<u8> {
        let first = self.history[0];
        (self.filled == self.history.len() && self.history.iter().all(|&d| d == first))
            .then_some(first)
    }

    fn clear(&mut self) {
        self.history.fill(0);
        self.head = 0;
        self.filled = 0;
        self.last = 0;
        self.fixed = None;
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed.is_some()
    }

    /// Committed digit if fixed, otherwise the latest reading (0 before any).
    pub fn digit(&self) -> u8 {
        self.fixed.unwrap_or(self.last)
    }

    /// Readings currently held, at most the window length.
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }
}

/// Puzzle-level bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PuzzleTrackState {
    pub state: TrackState,
    pub lost_count: usize,
    pub all_fixed: bool,
    all_fixed_emitted: bool,
}

/// Owns the 81 cell histories and the puzzle presence state.
#[derive(Clone, Debug)]
pub struct ConsensusTracker {
    params: TrackerParams,
    cells: Vec<CellState>,
    puzzle: PuzzleTrackState,
}

impl ConsensusTracker {
    pub fn new(params: TrackerParams) -> Self {
        let cells = (0..CELL_COUNT)
            .map(|_| CellState::new(params.fix_window))
            .collect();
        Self {
            params,
            cells,
            puzzle: PuzzleTrackState::default(),
        }
    }

    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    /// Record a frame in which the puzzle was found.
    ///
    /// `classify(row, col)` is called for every unfixed cell; pass `None` when
    /// no classifier is available, in which case no cell advances.
    pub fn frame_found(
        &mut self,
        classify: Option<&mut dyn FnMut(usize, usize) -> u8>,
    ) -> Vec<TrackerEvent> {
        let mut events = Vec::new();

        if self.puzzle.state == TrackState::Absent {
            info!("puzzle appeared");
            self.puzzle.state = TrackState::Tracking;
            events.push(TrackerEvent::PuzzleAppeared);
        }
        self.puzzle.lost_count = 0;

        if let Some(classify) = classify {
            for (idx, cell) in self.cells.iter_mut().enumerate() {
                if cell.is_fixed() {
                    continue;
                }
                let (row, col) = (idx / GRID_SIZE, idx % GRID_SIZE);
                let digit = classify(row, col);
                cell.push(digit);
                events.push(TrackerEvent::CellDigitChanged { row, col, digit });

                if let Some(digit) = cell.unanimous() {
                    cell.fixed = Some(digit);
                    debug!("cell ({row}, {col}) fixed to {digit}");
                    events.push(TrackerEvent::CellDigitFixed { row, col, digit });
                }
            }
        }

        self.puzzle.all_fixed = self.cells.iter().all(CellState::is_fixed);
        if !self.puzzle.all_fixed {
            self.puzzle.all_fixed_emitted = false;
        } else if !self.puzzle.all_fixed_emitted {
            info!("all digits fixed");
            self.puzzle.all_fixed_emitted = true;
            events.push(TrackerEvent::AllDigitsFixed);
        }
        events
    }

    /// Record a frame without the puzzle.
    pub fn frame_lost(&mut self) -> Vec<TrackerEvent> {
        if self.puzzle.state == TrackState::Absent {
            return Vec::new();
        }
        self.puzzle.lost_count += 1;
        if self.puzzle.lost_count < self.params.lost_frames {
            return Vec::new();
        }

        info!(
            "puzzle disappeared after {} missed frames",
            self.puzzle.lost_count
        );
        self.reset();
        vec![TrackerEvent::PuzzleDisappeared]
    }

    /// Back to `Absent` with all cells cleared, without emitting anything.
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(CellState::clear);
        self.puzzle = PuzzleTrackState::default();
    }

    pub fn state(&self) -> TrackState {
        self.puzzle.state
    }

    pub fn puzzle(&self) -> &PuzzleTrackState {
        &self.puzzle
    }

    pub fn all_fixed(&self) -> bool {
        self.puzzle.all_fixed
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellState> {
        (row < GRID_SIZE && col < GRID_SIZE).then(|| &self.cells[row * GRID_SIZE + col])
    }

    /// Current reading of every cell, fixed or not.
    pub fn current_grid(&self) -> Grid {
        let mut grid = Grid::empty();
        for (idx, cell) in self.cells.iter().enumerate() {
            grid.set(idx / GRID_SIZE, idx % GRID_SIZE, cell.digit());
        }
        grid
    }

    /// Committed digits, only once every cell is fixed.
    pub fn fixed_grid(&self) -> Option<Grid> {
        self.puzzle.all_fixed.then(|| self.current_grid())
    }

    pub fn fixed_mask(&self) -> [[bool; GRID_SIZE]; GRID_SIZE] {
        let mut out = [[false; GRID_SIZE]; GRID_SIZE];
        for (idx, cell) in self.cells.iter().enumerate() {
            out[idx / GRID_SIZE][idx % GRID_SIZE] = cell.is_fixed();
        }
        out
    }
}

impl Default for ConsensusTracker {
    fn default() -> Self {
        Self::new(TrackerParams::default())
    }
}
