//! The playback clock.
//!
//! A fixed-period tick engine. Each tick performs the deferred replay
//! swap if one is armed, serves the hold sub-state (a frame with
//! repetition N stays on screen for N ticks), then dequeues and replays
//! the next frame. The tick body is a plain method so tests drive it
//! directly; the scheduler thread supplies real time between calls.
//!
//! The queue lock is taken only for list and flag mutation, never across
//! the replay into the render target, so producers are never blocked on
//! rendering.

use std::sync::Mutex;
use std::time::Duration;

use tracing::{trace, warn};

use crate::config::ClockConfig;
use crate::error::Result;
use crate::queue::FrameQueue;
use crate::record::Frame;
use crate::render::RenderTarget;

/// Hold sub-state: how much longer the current frame stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    /// No frame is being held; the next tick dequeues.
    Idle,
    /// The current frame remains on screen for this many more ticks.
    Holding(u32),
}

impl Hold {
    fn begin(repetition: u32) -> Self {
        if repetition == 0 {
            Hold::Idle
        } else {
            Hold::Holding(repetition)
        }
    }

    /// Consume one tick of hold. Returns true if a tick was consumed.
    fn consume(&mut self) -> bool {
        match *self {
            Hold::Idle => false,
            Hold::Holding(1) => {
                *self = Hold::Idle;
                true
            }
            Hold::Holding(n) => {
                *self = Hold::Holding(n - 1);
                true
            }
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The clock is not running; nothing happened.
    Idle,
    /// The current frame stayed on screen; its hold count went down.
    Held,
    /// A new frame was dequeued and replayed.
    Applied(Frame),
    /// A frame was consumed without being shown: zero repetition, or its
    /// replay failed and was skipped.
    Skipped,
    /// Nothing was pending; the clock stopped.
    Exhausted,
}

/// Fixed-period playback engine.
#[derive(Debug)]
pub struct PlaybackClock {
    interval: Duration,
    running: bool,
    hold: Hold,
    ticks: u64,
}

impl PlaybackClock {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            interval: config.tick_interval(),
            running: false,
            hold: Hold::Idle,
            ticks: 0,
        }
    }

    /// The configured tick period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current hold sub-state.
    pub fn hold(&self) -> Hold {
        self.hold
    }

    /// Ticks executed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Drop any hold left over from interrupted playback.
    ///
    /// Stepping and seeking call this so the next play resumes with a
    /// fresh dequeue instead of finishing a stale hold.
    pub fn clear_hold(&mut self) {
        self.hold = Hold::Idle;
    }

    /// Execute one tick against the queue and target.
    ///
    /// Replay failures are logged and reported as [`TickOutcome::Skipped`];
    /// they never abort the clock. `Err` is reserved for lock poisoning.
    pub fn tick(
        &mut self,
        queue: &Mutex<FrameQueue>,
        target: &mut dyn RenderTarget,
    ) -> Result<TickOutcome> {
        self.ticks += 1;

        {
            let mut q = queue.lock()?;
            if q.swap_if_armed() {
                trace!(tick = self.ticks, "performed deferred replay swap");
            }
        }

        if self.hold.consume() {
            trace!(tick = self.ticks, hold = ?self.hold, "holding current frame");
            return Ok(TickOutcome::Held);
        }

        let next = { queue.lock()?.dequeue_next() };
        let Some(frame) = next else {
            self.running = false;
            trace!(tick = self.ticks, "pending side exhausted, clock stopped");
            return Ok(TickOutcome::Exhausted);
        };

        self.hold = Hold::begin(frame.repetition_count());
        if !self.hold.consume() {
            // zero repetition: the frame is consumed without display
            trace!(tick = self.ticks, "zero-repetition frame consumed unseen");
            return Ok(TickOutcome::Skipped);
        }

        match render_frame(&frame, target) {
            Ok(()) => Ok(TickOutcome::Applied(frame)),
            Err(err) => {
                warn!(tick = self.ticks, error = %err, "frame replay failed, skipping frame");
                self.hold = Hold::Idle;
                Ok(TickOutcome::Skipped)
            }
        }
    }
}

/// Bracket one frame replay in the target's begin/end calls.
pub(crate) fn render_frame(frame: &Frame, target: &mut dyn RenderTarget) -> Result<()> {
    let canvas = target.begin_frame()?;
    let result = frame.replay(canvas);
    target.end_frame()?;
    result
}
