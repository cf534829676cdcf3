//! Transport state machine.
//!
//! Tracks the player's logical phase and derives which controls a host
//! should enable from {mode, queue shape, phase}. The phase only changes
//! on the thread driving the player; observers are notified synchronously
//! there, in registration order.

use tracing::debug;

use crate::config::Mode;

/// Logical playback phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No frame has been produced yet.
    Unstarted,
    /// Frames are arriving; the producer has not finished.
    Loading,
    /// The clock is ticking.
    Playing,
    /// Fully loaded and stopped, ready to play.
    ReadyPaused,
    /// The sequence ended and cannot be replayed. Terminal.
    Finished,
    /// The sequence ended with a replay swap armed for the next play.
    ReplayReady,
}

/// Which transport controls the host should enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub play: bool,
    pub step_back: bool,
    pub step_forward: bool,
    pub seek: bool,
    pub snapshot: bool,
}

/// Snapshot of the queue fed into control derivation.
#[derive(Debug, Clone, Copy)]
pub struct QueueView {
    pub pending_empty: bool,
    pub played_empty: bool,
    pub fully_loaded: bool,
}

/// Callbacks for hosts mirroring player state.
///
/// Every method defaults to a no-op so hosts implement only what they
/// show. Callbacks run on the thread driving the player (the scheduler
/// thread when one is attached), in registration order.
pub trait TransportObserver: Send {
    /// The phase changed; `controls` reflects the new enablement.
    fn phase_changed(&mut self, phase: Phase, controls: Controls) {
        let _ = (phase, controls);
    }

    /// The position indicator moved (selectable mode only).
    fn position_changed(&mut self, percent: u8) {
        let _ = percent;
    }

    /// Loading progressed to `percent` of the estimated total.
    fn loading_progress(&mut self, percent: u8) {
        let _ = percent;
    }

    /// The loading indicator should be shown or hidden.
    fn loading_indicator(&mut self, visible: bool) {
        let _ = visible;
    }
}

/// Phase owner and control derivation.
#[derive(Debug)]
pub struct TransportController {
    mode: Mode,
    phase: Phase,
}

impl TransportController {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            phase: Phase::Unstarted,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Move to a new phase. Returns true if the phase actually changed.
    pub fn set_phase(&mut self, phase: Phase) -> bool {
        if self.phase == phase {
            return false;
        }
        debug!(from = ?self.phase, to = ?phase, "transport phase change");
        self.phase = phase;
        true
    }

    /// Phase entered when loading completes, per mode.
    pub fn loaded_phase(&self) -> Phase {
        if self.mode.auto_runs() {
            Phase::Playing
        } else {
            Phase::ReadyPaused
        }
    }

    /// Phase entered when the pending side is exhausted, per mode.
    pub fn exhausted_phase(&self) -> Phase {
        if self.mode.keeps_frames() {
            Phase::ReplayReady
        } else {
            Phase::Finished
        }
    }

    /// Whether `play()` may start the clock right now.
    pub fn can_play(&self) -> bool {
        matches!(self.phase, Phase::ReadyPaused | Phase::ReplayReady)
    }

    /// Whether stepping and seeking are accepted right now.
    pub fn can_step(&self, view: QueueView) -> bool {
        view.fully_loaded && self.phase != Phase::Playing
    }

    /// Derive control enablement from the current phase and queue shape.
    pub fn controls(&self, view: QueueView) -> Controls {
        let selectable = self.mode.is_selectable() && view.fully_loaded;
        let stopped = self.phase != Phase::Playing;
        Controls {
            play: self.mode.has_controls()
                && view.fully_loaded
                && matches!(
                    self.phase,
                    Phase::Playing | Phase::ReadyPaused | Phase::ReplayReady
                ),
            step_back: selectable && stopped && !view.played_empty,
            step_forward: selectable && stopped && !view.pending_empty,
            seek: selectable && stopped,
            snapshot: selectable && stopped,
        }
    }
}
