//! Loading progress estimation.
//!
//! Producers may announce an estimated frame count up front. While frames
//! stream in we report percent-complete against that estimate, and a
//! one-shot latch decides whether loading is slow enough to be worth
//! surfacing at all: checked exactly once, on the first frame committed
//! more than a second after production started, and only revealing the
//! indicator when no more than a quarter of the estimate has arrived.

use std::time::{Duration, Instant};

use tracing::trace;

/// Minimum production time before the reveal latch is consulted.
const LATCH_DELAY: Duration = Duration::from_millis(1000);

/// Reveal only if at most this percentage of the estimate has arrived.
const LATCH_THRESHOLD: u64 = 25;

/// Outcome of recording one committed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Percent of the estimated total produced so far, absent without an
    /// estimate.
    pub percent: Option<u8>,
    /// True exactly once, when the latch fires and the indicator should
    /// be shown.
    pub reveal: bool,
}

/// Tracks produced frames against an optional estimated total.
#[derive(Debug)]
pub struct ProgressEstimator {
    produced: u64,
    estimated_total: u64,
    start: Option<Instant>,
    latch_armed: bool,
}

impl ProgressEstimator {
    pub fn new() -> Self {
        Self {
            produced: 0,
            estimated_total: 0,
            start: None,
            latch_armed: false,
        }
    }

    pub fn set_estimated_total(&mut self, total: u64) {
        self.estimated_total = total;
    }

    pub fn estimated_total(&self) -> u64 {
        self.estimated_total
    }

    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Record the start of production and arm the reveal latch. Later
    /// calls keep the original start time.
    pub fn on_first_request(&mut self, now: Instant) {
        if self.start.is_none() {
            self.start = Some(now);
            self.latch_armed = true;
            trace!("loading clock started");
        }
    }

    /// Record one committed frame weighing `weight` display slots.
    pub fn on_enqueue(&mut self, weight: u64, now: Instant) -> ProgressUpdate {
        self.produced += weight;
        let reveal = self.check_latch(now);
        ProgressUpdate {
            percent: self.percent(),
            reveal,
        }
    }

    /// Percent of the estimate produced so far, clamped to 100.
    pub fn percent(&self) -> Option<u8> {
        if self.estimated_total == 0 {
            return None;
        }
        Some((self.produced * 100 / self.estimated_total).min(100) as u8)
    }

    /// Stop tracking. The latch can no longer fire.
    pub fn finish(&mut self) {
        self.latch_armed = false;
        self.start = None;
    }

    pub fn reset(&mut self) {
        self.produced = 0;
        self.start = None;
        self.latch_armed = false;
    }

    fn check_latch(&mut self, now: Instant) -> bool {
        if !self.latch_armed {
            return false;
        }
        let Some(start) = self.start else {
            return false;
        };
        if now.duration_since(start) <= LATCH_DELAY {
            return false;
        }
        // One shot: the first commit past the delay decides, then the
        // latch stays down for the rest of the run.
        self.latch_armed = false;
        if self.estimated_total == 0 {
            return false;
        }
        self.produced * 100 / self.estimated_total <= LATCH_THRESHOLD
    }
}

impl Default for ProgressEstimator {
    fn default() -> Self {
        Self::new()
    }
}
