//! Dedicated per-frame worker thread.

use crate::{FrameSource, SudokuPipeline, TrackerEvent};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use sudoku_lens_solver::Grid;

/// Everything the worker reports back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineEvent {
    Tracker(TrackerEvent),
    /// Solver outcome for the grid committed by `AllDigitsFixed`.
    Solved {
        puzzle: Grid,
        solution: Grid,
        success: bool,
    },
    /// The frame source is exhausted; the worker has stopped.
    EndOfStream,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub frames: u64,
    pub found: u64,
    pub solved: u64,
}

#[derive(thiserror::Error, Debug)]
pub enum WorkerError {
    #[error("worker thread panicked")]
    Panicked,
}

/// Runs a [`SudokuPipeline`] over a [`FrameSource`] on its own thread.
///
/// The stop flag is checked once per frame; [`PipelineWorker::join`] waits for
/// the loop to notice it. A source that blocks (e.g. a
/// [`crate::LatestFrameSlot`]) must also be closed for the loop to wake up.
pub struct PipelineWorker {
    stop: Arc<AtomicBool>,
    events: Receiver<PipelineEvent>,
    handle: Option<JoinHandle<WorkerStats>>,
}

impl PipelineWorker {
    pub fn spawn<S>(pipeline: Arc<SudokuPipeline>, source: S) -> Self
    where
        S: FrameSource + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, events) = mpsc::channel();
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("sudoku-lens-worker".into())
            .spawn(move || run(&pipeline, source, &flag, &tx));

        let handle = match handle {
            Ok(h) => Some(h),
            Err(err) => {
                warn!("failed to spawn worker thread: {err}");
                None
            }
        };
        Self {
            stop,
            events,
            handle,
        }
    }

    pub fn events(&self) -> &Receiver<PipelineEvent> {
        &self.events
    }

    /// Ask the loop to exit before its next frame.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the loop to exit.
    pub fn join(mut self) -> Result<WorkerStats, WorkerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| WorkerError::Panicked),
            None => Ok(WorkerStats::default()),
        }
    }
}

impl Drop for PipelineWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<S: FrameSource>(
    pipeline: &SudokuPipeline,
    mut source: S,
    stop: &AtomicBool,
    tx: &Sender<PipelineEvent>,
) -> WorkerStats {
    let mut stats = WorkerStats::default();

    while !stop.load(Ordering::Acquire) {
        let Some(frame) = source.next_frame() else {
            let _ = tx.send(PipelineEvent::EndOfStream);
            break;
        };
        stats.frames += 1;

        let outcome = pipeline.update_frame(&frame);
        if outcome.found {
            stats.found += 1;
        }

        for event in outcome.events {
            let _ = tx.send(PipelineEvent::Tracker(event));
            if event != TrackerEvent::AllDigitsFixed {
                continue;
            }
            let Some(puzzle) = pipeline.fixed_grid() else {
                continue;
            };
            let (solution, success) = pipeline.solve(&puzzle);
            if success {
                stats.solved += 1;
                info!("puzzle solved");
            } else {
                info!("committed digits have no solution");
            }
            let _ = tx.send(PipelineEvent::Solved {
                puzzle,
                solution,
                success,
            });
        }
    }

    info!(
        "worker finished: {} frames, {} with puzzle",
        stats.frames, stats.found
    );
    stats
}
