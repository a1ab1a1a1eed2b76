//! Frame sources feeding the worker.

use image::GrayImage;
use log::warn;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex, PoisonError};

/// Produces frames until the stream ends.
pub trait FrameSource {
    /// Next frame, or `None` at end of stream. May block.
    fn next_frame(&mut self) -> Option<GrayImage>;
}

/// Image files decoded one by one; unreadable files are skipped.
pub struct ImageSequenceSource {
    paths: VecDeque<PathBuf>,
}

impl ImageSequenceSource {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Option<GrayImage> {
        while let Some(path) = self.paths.pop_front() {
            match image::open(&path) {
                Ok(img) => return Some(img.to_luma8()),
                Err(err) => warn!("skipping frame {}: {err}", path.display()),
            }
        }
        None
    }
}

#[derive(Default)]
struct SlotState {
    frame: Option<GrayImage>,
    dropped: u64,
    closed: bool,
}

/// Single-frame mailbox between a producer and the worker.
///
/// Publishing replaces any frame the worker has not picked up yet, so the
/// worker always gets the newest frame and never a backlog.
#[derive(Default)]
pub struct LatestFrameSlot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl LatestFrameSlot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store `frame`, replacing (and counting) an unconsumed one.
    pub fn publish(&self, frame: GrayImage) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.frame.replace(frame).is_some() {
            state.dropped += 1;
        }
        self.ready.notify_one();
    }

    /// End the stream once the pending frame, if any, has been taken.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.closed = true;
        self.ready.notify_all();
    }

    /// Take the pending frame without waiting.
    pub fn try_take(&self) -> Option<GrayImage> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .frame
            .take()
    }

    /// Block until a frame is published or the slot is closed.
    pub fn wait_take(&self) -> Option<GrayImage> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(frame) = state.frame.take() {
                return Some(frame);
            }
            if state.closed {
                return None;
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Frames overwritten before the worker took them.
    pub fn dropped(&self) -> u64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .dropped
    }
}

impl FrameSource for Arc<LatestFrameSlot> {
    fn next_frame(&mut self) -> Option<GrayImage> {
        self.wait_take()
    }
}
