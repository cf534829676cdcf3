//! The frame queue.
//!
//! One contiguous store split by a cursor: frames below the cursor have
//! been played, frames at and above it are pending. Keeping both sides in
//! one `VecDeque` makes the replay swap a cursor reset instead of a list
//! exchange, so it is O(1) and never touches frame contents. Unkept
//! frames skip the played side entirely: they are popped from the front
//! and handed out by value, so dropping them releases the recording.
//!
//! The queue also owns the `fully_loaded`, `finished`, and `need_swap`
//! flags plus the repetition-weighted produced total that position and
//! loading percentages divide by. All of it is mutated under one external
//! mutex (see [`SharedQueue`]); no method here blocks.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::record::Frame;

/// A queue behind the single mutex everything shares.
pub type SharedQueue = Arc<Mutex<FrameQueue>>;

/// Buffer of recorded frames split into played and pending sides.
#[derive(Debug, Default)]
pub struct FrameQueue {
    frames: VecDeque<Frame>,
    /// Frames below the cursor are played, the rest are pending.
    cursor: usize,
    /// Repetition-weighted total of everything ever enqueued.
    produced_total: u64,
    fully_loaded: bool,
    finished: bool,
    need_swap: bool,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh queue already wrapped for sharing.
    pub fn shared() -> SharedQueue {
        Arc::new(Mutex::new(Self::new()))
    }

    // === Producer side ===

    /// Append a frame to the pending tail. Never blocks; there is no
    /// backpressure by design.
    pub fn enqueue(&mut self, frame: Frame) {
        self.produced_total += u64::from(frame.repetition_count());
        self.frames.push_back(frame);
    }

    /// Record that the producer will supply no more frames.
    ///
    /// Returns a clone of the pending head so the caller can display one
    /// frame immediately, even if playback never starts. The head itself
    /// stays queued and will be dequeued again by the first tick.
    pub fn mark_fully_loaded(&mut self) -> Option<Frame> {
        self.fully_loaded = true;
        self.frames.get(self.cursor).cloned()
    }

    // === Clock side ===

    /// Take the next pending frame.
    ///
    /// Kept frames move to the played side and a clone is returned; unkept
    /// frames are handed out by value. An empty pending side sets
    /// `finished` and returns `None`.
    pub fn dequeue_next(&mut self) -> Option<Frame> {
        if self.cursor >= self.frames.len() {
            self.finished = true;
            return None;
        }
        if self.frames[self.cursor].is_kept() {
            self.cursor += 1;
            Some(self.frames[self.cursor - 1].clone())
        } else {
            // unkept frames never build a played side, so this is the front
            self.frames.remove(self.cursor)
        }
    }

    /// Perform the replay swap if one is armed. Returns true if swapped.
    pub fn swap_if_armed(&mut self) -> bool {
        if self.need_swap {
            self.swap_for_replay();
            true
        } else {
            false
        }
    }

    /// Exchange played and pending by resetting the cursor.
    ///
    /// O(1): no frame is moved or copied, the split point just returns to
    /// the start. Clears `finished` so the clock can run again.
    pub fn swap_for_replay(&mut self) {
        debug!(frames = self.frames.len(), "replay swap");
        self.cursor = 0;
        self.finished = false;
        self.need_swap = false;
    }

    /// Arm a deferred replay swap for the start of the next tick.
    pub fn arm_replay_swap(&mut self) {
        self.need_swap = true;
    }

    // === Stepping, clock stopped ===

    /// Move up to `n` played frames back onto the pending head.
    ///
    /// Returns the new pending head (the last frame moved) for the caller
    /// to display; `None` when nothing has been played. A successful step
    /// cancels any armed replay swap and un-finishes the queue.
    pub fn step_back(&mut self, n: usize) -> Option<Frame> {
        if n == 0 || self.cursor == 0 {
            return None;
        }
        self.cursor -= n.min(self.cursor);
        self.need_swap = false;
        self.finished = false;
        Some(self.frames[self.cursor].clone())
    }

    /// Move up to `n` pending frames to the played side.
    ///
    /// Unkept frames are discarded as they pass. Returns the last frame
    /// moved for the caller to display; `None` when nothing is pending.
    /// A successful step cancels any armed replay swap and un-finishes
    /// the queue.
    pub fn step_forward(&mut self, n: usize) -> Option<Frame> {
        if n == 0 || self.pending_is_empty() {
            return None;
        }
        let mut last = None;
        for _ in 0..n {
            if self.cursor >= self.frames.len() {
                break;
            }
            if self.frames[self.cursor].is_kept() {
                self.cursor += 1;
                last = Some(self.frames[self.cursor - 1].clone());
            } else {
                last = self.frames.remove(self.cursor);
            }
        }
        self.need_swap = false;
        self.finished = false;
        last
    }

    // === Teardown ===

    /// Drop every frame and reset all flags and counters.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.cursor = 0;
        self.produced_total = 0;
        self.fully_loaded = false;
        self.finished = false;
        self.need_swap = false;
    }

    // === Accessors ===

    /// Frames not yet displayed.
    pub fn pending_len(&self) -> usize {
        self.frames.len() - self.cursor
    }

    /// Frames retained after display.
    pub fn played_len(&self) -> usize {
        self.cursor
    }

    /// Frames currently held, both sides.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn pending_is_empty(&self) -> bool {
        self.cursor >= self.frames.len()
    }

    /// Repetition-weighted total of everything ever enqueued.
    pub fn produced_total(&self) -> u64 {
        self.produced_total
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.fully_loaded
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn swap_armed(&self) -> bool {
        self.need_swap
    }

    /// Percent of the produced total that has been played, clamped to
    /// [0, 100] and forced to 100 once nothing is pending.
    ///
    /// The denominator is repetition-weighted while the numerator counts
    /// frames, matching what a position slider should show while a
    /// long-held frame sits on screen.
    pub fn position_percent(&self) -> u8 {
        if self.pending_is_empty() {
            return 100;
        }
        if self.produced_total == 0 {
            return 0;
        }
        ((self.cursor as u64 * 100) / self.produced_total).min(100) as u8
    }
}
