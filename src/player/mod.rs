//! The player facade.
//!
//! [`Player`] wires the pieces together: the frame queue, the playback
//! clock, the transport state machine, and the loading estimator. It owns
//! the render target and is the single place where rendering happens.
//!
//! The facade itself is single-threaded by design: every method mutates
//! state on the calling thread, and `tick` is a plain method so tests can
//! drive playback deterministically. Cross-thread use goes through
//! [`crate::sched::PlayerHandle`], which moves the player onto a
//! dedicated thread and marshals transport requests to it. Producers on
//! foreign threads reach the queue through the shared state directly, so
//! enqueueing never waits for rendering.

pub mod clock;
pub mod progress;
pub mod transport;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::{ClockConfig, Mode};
use crate::error::{Error, Result};
use crate::queue::FrameQueue;
use crate::record::{Frame, FrameRecorder, Sketch};
use crate::render::RenderTarget;

use self::clock::{render_frame, PlaybackClock, TickOutcome};
use self::progress::{ProgressEstimator, ProgressUpdate};
use self::transport::{Controls, Phase, QueueView, TransportController, TransportObserver};

/// State reachable from threads other than the one driving playback.
///
/// The queue takes frames from any producer thread; the recorder hands
/// out at most one open sketch at a time; the estimator tallies loading
/// progress. Each sits behind its own mutex and none is ever held across
/// a call into the render target.
pub(crate) struct SharedState {
    pub(crate) queue: Mutex<FrameQueue>,
    pub(crate) recorder: Mutex<Option<FrameRecorder>>,
    pub(crate) progress: Mutex<ProgressEstimator>,
}

impl SharedState {
    pub(crate) fn new() -> Self {
        Self {
            queue: Mutex::new(FrameQueue::new()),
            recorder: Mutex::new(None),
            progress: Mutex::new(ProgressEstimator::new()),
        }
    }
}

/// Open a sketch for the next frame. Usable from any thread.
pub(crate) fn begin_frame_shared(shared: &SharedState) -> Result<Sketch> {
    let sketch = {
        let mut recorder = shared.recorder.lock()?;
        let recorder = recorder
            .as_mut()
            .ok_or_else(|| Error::state("player is not configured"))?;
        recorder.begin()?
    };
    shared.progress.lock()?.on_first_request(Instant::now());
    Ok(sketch)
}

/// Finalize a sketch into a frame. Usable from any thread.
pub(crate) fn complete_shared(
    shared: &SharedState,
    sketch: Sketch,
    repetition: u32,
) -> Result<Frame> {
    let mut recorder = shared.recorder.lock()?;
    let recorder = recorder
        .as_mut()
        .ok_or_else(|| Error::state("player is not configured"))?;
    Ok(recorder.complete(sketch, repetition))
}

/// Discard an open sketch. Usable from any thread.
pub(crate) fn abandon_shared(shared: &SharedState, sketch: Sketch) -> Result<()> {
    let mut recorder = shared.recorder.lock()?;
    let recorder = recorder
        .as_mut()
        .ok_or_else(|| Error::state("player is not configured"))?;
    recorder.abandon(sketch);
    Ok(())
}

/// Append a completed frame to the queue. Usable from any thread.
///
/// Returns the progress update for the driving thread to act on; the
/// queue mutation itself happens here, immediately.
pub(crate) fn enqueue_shared(shared: &SharedState, frame: Frame) -> Result<ProgressUpdate> {
    if shared.recorder.lock()?.is_none() {
        return Err(Error::state("enqueue before configuration"));
    }
    let weight = u64::from(frame.repetition_count());
    {
        let mut queue = shared.queue.lock()?;
        if queue.is_fully_loaded() {
            return Err(Error::state("enqueue after loading was marked complete"));
        }
        queue.enqueue(frame);
    }
    Ok(shared.progress.lock()?.on_enqueue(weight, Instant::now()))
}

/// Recorded-frame animation player.
pub struct Player {
    shared: Arc<SharedState>,
    transport: TransportController,
    clock: Option<PlaybackClock>,
    config: Option<ClockConfig>,
    target: Box<dyn RenderTarget>,
    observers: Vec<Box<dyn TransportObserver>>,
    current: Option<Frame>,
}

impl Player {
    /// Create a player in the given mode, rendering onto `target`.
    ///
    /// The player is unusable until [`configure`] supplies the clock
    /// geometry and rate.
    ///
    /// [`configure`]: Player::configure
    pub fn new(mode: Mode, target: impl RenderTarget + 'static) -> Self {
        Self {
            shared: Arc::new(SharedState::new()),
            transport: TransportController::new(mode),
            clock: None,
            config: None,
            target: Box::new(target),
            observers: Vec::new(),
            current: None,
        }
    }

    /// Register an observer. Registration order is notification order.
    pub fn add_observer(&mut self, observer: impl TransportObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // === Configuration ===

    /// Supply frame geometry and rate, exactly once.
    ///
    /// Repeating the call with identical values is a no-op; differing
    /// values are rejected so a half-played sequence can never change
    /// shape.
    pub fn configure(&mut self, config: ClockConfig) -> Result<()> {
        if let Some(existing) = &self.config {
            if *existing == config {
                debug!("identical reconfiguration ignored");
                return Ok(());
            }
            return Err(Error::configuration(format!(
                "already configured as {}x{} at {} fps",
                existing.width, existing.height, existing.frame_rate
            )));
        }
        let keep = self.transport.mode().keeps_frames();
        *self.shared.recorder.lock()? = Some(FrameRecorder::new(config, keep));
        self.clock = Some(PlaybackClock::new(&config));
        debug!(
            width = config.width,
            height = config.height,
            rate = config.frame_rate,
            "clock configured"
        );
        self.config = Some(config);
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// The tick period, once configured.
    pub fn tick_interval(&self) -> Option<Duration> {
        self.config.map(|c| c.tick_interval())
    }

    // === Producer surface ===

    /// Open a sketch for the next frame.
    pub fn begin_frame(&mut self) -> Result<Sketch> {
        begin_frame_shared(&self.shared)
    }

    /// Finalize a sketch into a frame shown for `repetition` ticks and
    /// queue it for playback.
    pub fn finish_frame(&mut self, sketch: Sketch, repetition: u32) -> Result<()> {
        let frame = complete_shared(&self.shared, sketch, repetition)?;
        let update = enqueue_shared(&self.shared, frame)?;
        self.after_enqueue(update)
    }

    /// Discard an open sketch without producing a frame.
    pub fn abandon_frame(&mut self, sketch: Sketch) -> Result<()> {
        abandon_shared(&self.shared, sketch)
    }

    /// Announce how many display slots the producer expects to fill, for
    /// the loading indicator. Zero disables progress reporting.
    pub fn set_estimated_frame_count(&mut self, total: u64) -> Result<()> {
        self.shared.progress.lock()?.set_estimated_total(total);
        Ok(())
    }

    pub fn estimated_frame_count(&self) -> u64 {
        self.shared
            .progress
            .lock()
            .map(|p| p.estimated_total())
            .unwrap_or_default()
    }

    /// Phase bookkeeping after a frame landed in the queue.
    pub(crate) fn after_enqueue(&mut self, update: ProgressUpdate) -> Result<()> {
        if self.transport.phase() == Phase::Unstarted {
            self.change_phase(Phase::Loading)?;
        }
        if update.reveal {
            for observer in &mut self.observers {
                observer.loading_indicator(true);
            }
        }
        if let Some(percent) = update.percent {
            for observer in &mut self.observers {
                observer.loading_progress(percent);
            }
        }
        Ok(())
    }

    /// Declare the frame stream complete.
    ///
    /// Shows the pending head immediately so at least one frame is
    /// visible even if playback never starts, hides the loading
    /// indicator, and enters the mode's loaded phase; auto-run modes
    /// start the clock. A second call is a no-op.
    pub fn mark_fully_loaded(&mut self) -> Result<()> {
        if self.config.is_none() {
            return Err(Error::state("mark_fully_loaded before configuration"));
        }
        if self.is_loaded() {
            return Ok(());
        }
        self.shared.progress.lock()?.finish();
        let head = self.shared.queue.lock()?.mark_fully_loaded();
        if let Some(frame) = head {
            self.display(&frame);
        }
        for observer in &mut self.observers {
            observer.loading_indicator(false);
        }
        let next = self.transport.loaded_phase();
        if next == Phase::Playing {
            if let Some(clock) = self.clock.as_mut() {
                clock.start();
            }
        }
        self.change_phase(next)?;
        self.notify_position()
    }

    // === Transport surface ===

    /// Start or resume playback. A no-op unless the player is paused or
    /// replay-ready; in particular, a no-op while frames are still
    /// loading.
    pub fn play(&mut self) -> Result<()> {
        if !self.transport.can_play() {
            debug!(phase = ?self.transport.phase(), "play ignored");
            return Ok(());
        }
        if let Some(clock) = self.clock.as_mut() {
            clock.start();
        }
        self.change_phase(Phase::Playing)
    }

    /// Pause playback, keeping every queued frame and any hold in
    /// progress. A no-op unless playing.
    pub fn stop(&mut self) -> Result<()> {
        if !self.transport.is_playing() {
            return Ok(());
        }
        if let Some(clock) = self.clock.as_mut() {
            clock.stop();
        }
        self.change_phase(Phase::ReadyPaused)
    }

    /// Step up to `n` frames backward and show the frame stepped onto.
    ///
    /// Accepted only once loading is complete and the clock is stopped;
    /// otherwise, and when nothing has been played, a no-op returning
    /// false.
    pub fn step_back(&mut self, n: usize) -> Result<bool> {
        self.step_with(|queue| queue.step_back(n))
    }

    /// Step up to `n` frames forward and show the frame stepped onto.
    ///
    /// Same legality as [`step_back`]; a no-op when nothing is pending.
    ///
    /// [`step_back`]: Player::step_back
    pub fn step_forward(&mut self, n: usize) -> Result<bool> {
        self.step_with(|queue| queue.step_forward(n))
    }

    /// Jump to a position given as a percentage of everything produced.
    ///
    /// The target slot is `pct * produced_total / 100`; the difference to
    /// the current played length is applied as one forward or backward
    /// step, clamped to what is actually available. Same legality as
    /// stepping.
    pub fn seek_to_percent(&mut self, pct: u8) -> Result<bool> {
        if !self.transport.can_step(self.queue_view()?) {
            debug!(pct, phase = ?self.transport.phase(), "seek ignored");
            return Ok(false);
        }
        let (forward, steps) = {
            let queue = self.shared.queue.lock()?;
            let target = u64::from(pct.min(100)) * queue.produced_total() / 100;
            let played = queue.played_len() as u64;
            if target >= played {
                (true, ((target - played) as usize).min(queue.pending_len()))
            } else {
                (false, ((played - target) as usize).min(queue.played_len()))
            }
        };
        if steps == 0 {
            return Ok(false);
        }
        if forward {
            self.step_with(|queue| queue.step_forward(steps))
        } else {
            self.step_with(|queue| queue.step_back(steps))
        }
    }

    /// Clone of the currently displayed frame, when the snapshot control
    /// is available.
    pub fn snapshot(&self) -> Option<Frame> {
        let view = self.queue_view().ok()?;
        if !self.transport.controls(view).snapshot {
            return None;
        }
        self.current.clone()
    }

    /// Drop every frame and return to the unstarted phase. The clock
    /// configuration is kept.
    pub fn reset(&mut self) -> Result<()> {
        if let Some(clock) = self.clock.as_mut() {
            clock.stop();
            clock.clear_hold();
        }
        self.shared.queue.lock()?.clear();
        if let Some(recorder) = self.shared.recorder.lock()?.as_mut() {
            recorder.reset();
        }
        self.shared.progress.lock()?.reset();
        self.current = None;
        self.change_phase(Phase::Unstarted)
    }

    // === Clock driving ===

    /// Execute one clock tick, if the clock is running.
    ///
    /// Called by the scheduler thread at the configured period; tests
    /// call it directly to simulate time. Render failures inside the
    /// tick are logged and skipped, never returned.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let Some(clock) = self.clock.as_mut() else {
            return Ok(TickOutcome::Idle);
        };
        if !clock.is_running() {
            return Ok(TickOutcome::Idle);
        }
        let outcome = clock.tick(&self.shared.queue, self.target.as_mut())?;
        match &outcome {
            TickOutcome::Applied(frame) => {
                self.current = Some(frame.clone());
                self.notify_position()?;
            }
            TickOutcome::Skipped => {
                self.notify_position()?;
            }
            TickOutcome::Exhausted => {
                let terminal = self.transport.exhausted_phase();
                if terminal == Phase::ReplayReady {
                    self.shared.queue.lock()?.arm_replay_swap();
                }
                self.notify_position()?;
                self.change_phase(terminal)?;
            }
            TickOutcome::Held | TickOutcome::Idle => {}
        }
        Ok(outcome)
    }

    // === Accessors ===

    pub fn mode(&self) -> Mode {
        self.transport.mode()
    }

    pub fn phase(&self) -> Phase {
        self.transport.phase()
    }

    /// Whether the clock is ticking.
    pub fn is_running(&self) -> bool {
        self.clock
            .as_ref()
            .map(PlaybackClock::is_running)
            .unwrap_or_default()
    }

    /// Whether the producer has declared the stream complete.
    pub fn is_loaded(&self) -> bool {
        self.shared
            .queue
            .lock()
            .map(|q| q.is_fully_loaded())
            .unwrap_or_default()
    }

    /// Percent of the produced total already played.
    pub fn position_percent(&self) -> u8 {
        self.shared
            .queue
            .lock()
            .map(|q| q.position_percent())
            .unwrap_or_default()
    }

    pub fn pending_frames(&self) -> usize {
        self.shared
            .queue
            .lock()
            .map(|q| q.pending_len())
            .unwrap_or_default()
    }

    pub fn played_frames(&self) -> usize {
        self.shared
            .queue
            .lock()
            .map(|q| q.played_len())
            .unwrap_or_default()
    }

    /// Current control enablement for a host UI.
    pub fn controls(&self) -> Controls {
        match self.queue_view() {
            Ok(view) => self.transport.controls(view),
            Err(_) => Controls::default(),
        }
    }

    pub(crate) fn shared(&self) -> Arc<SharedState> {
        Arc::clone(&self.shared)
    }

    // === Internals ===

    fn queue_view(&self) -> Result<QueueView> {
        let queue = self.shared.queue.lock()?;
        Ok(QueueView {
            pending_empty: queue.pending_is_empty(),
            played_empty: queue.played_len() == 0,
            fully_loaded: queue.is_fully_loaded(),
        })
    }

    fn change_phase(&mut self, phase: Phase) -> Result<()> {
        if self.transport.set_phase(phase) {
            let controls = self.transport.controls(self.queue_view()?);
            for observer in &mut self.observers {
                observer.phase_changed(phase, controls);
            }
        }
        Ok(())
    }

    fn notify_position(&mut self) -> Result<()> {
        if !self.transport.mode().is_selectable() {
            return Ok(());
        }
        let percent = self.shared.queue.lock()?.position_percent();
        for observer in &mut self.observers {
            observer.position_changed(percent);
        }
        Ok(())
    }

    /// Render a frame outside the tick path and make it current.
    fn display(&mut self, frame: &Frame) {
        if let Err(err) = render_frame(frame, self.target.as_mut()) {
            warn!(error = %err, "frame display failed");
        }
        self.current = Some(frame.clone());
    }

    fn step_with(&mut self, op: impl FnOnce(&mut FrameQueue) -> Option<Frame>) -> Result<bool> {
        if !self.transport.can_step(self.queue_view()?) {
            debug!(phase = ?self.transport.phase(), "step ignored");
            return Ok(false);
        }
        let moved = {
            let mut queue = self.shared.queue.lock()?;
            op(&mut queue)
        };
        let Some(frame) = moved else {
            return Ok(false);
        };
        if let Some(clock) = self.clock.as_mut() {
            clock.clear_hold();
        }
        self.display(&frame);
        self.notify_position()?;
        // stepping out of a terminal phase re-arms the paused state
        if matches!(self.transport.phase(), Phase::Finished | Phase::ReplayReady) {
            self.change_phase(Phase::ReadyPaused)?;
        }
        Ok(true)
    }
}
