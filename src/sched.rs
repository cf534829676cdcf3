//! The scheduler thread.
//!
//! All state that affects rendering is owned by exactly one thread. The
//! [`PlayerHandle`] moves a configured [`Player`] onto a dedicated
//! playback thread and marshals transport requests to it over a channel;
//! their effects become observable once that thread executes them.
//! Producing frames is the one exception: sketches and enqueues go
//! straight to the shared queue from any thread and never wait on
//! rendering.
//!
//! The thread runs a deadline loop: while the clock is running it waits
//! on the channel until the next tick is due, executes the tick, and
//! schedules the next one; while stopped it just waits for commands.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::{ClockConfig, Mode};
use crate::error::{Error, Result};
use crate::player::progress::ProgressUpdate;
use crate::player::{abandon_shared, begin_frame_shared, complete_shared, enqueue_shared};
use crate::player::{Player, SharedState};
use crate::record::Sketch;
use crate::render::RenderTarget;

/// Poll period while the clock is stopped.
const IDLE_WAIT: Duration = Duration::from_millis(50);

/// Requests marshalled onto the scheduler thread.
#[derive(Debug)]
enum Command {
    Play,
    Stop,
    StepBack(usize),
    StepForward(usize),
    SeekToPercent(u8),
    MarkFullyLoaded,
    Enqueued(ProgressUpdate),
    Reset,
    Shutdown,
}

/// Cross-thread surface of a player running on its own thread.
///
/// Dropping the handle shuts the thread down and joins it.
pub struct PlayerHandle {
    shared: Arc<SharedState>,
    tx: Sender<Command>,
    thread: Option<JoinHandle<()>>,
}

impl PlayerHandle {
    /// Build a configured player and start its playback thread.
    pub fn spawn(
        mode: Mode,
        config: ClockConfig,
        target: impl RenderTarget + 'static,
    ) -> Result<Self> {
        let mut player = Player::new(mode, target);
        player.configure(config)?;
        Self::spawn_player(player)
    }

    /// Start the playback thread for an already prepared player.
    ///
    /// The player must be configured; observers should be registered
    /// beforehand since the player is no longer directly reachable.
    pub fn spawn_player(player: Player) -> Result<Self> {
        if !player.is_configured() {
            return Err(Error::state("player must be configured before spawning"));
        }
        let shared = player.shared();
        let (tx, rx) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("framecast-scheduler".into())
            .spawn(move || scheduler_loop(player, rx))
            .map_err(|err| Error::state(format!("failed to spawn scheduler thread: {err}")))?;
        Ok(Self {
            shared,
            tx,
            thread: Some(thread),
        })
    }

    // === Producer surface, any thread ===

    /// Open a sketch for the next frame.
    pub fn begin_frame(&self) -> Result<Sketch> {
        begin_frame_shared(&self.shared)
    }

    /// Finalize a sketch into a frame shown for `repetition` ticks and
    /// queue it for playback.
    pub fn finish_frame(&self, sketch: Sketch, repetition: u32) -> Result<()> {
        let frame = complete_shared(&self.shared, sketch, repetition)?;
        let update = enqueue_shared(&self.shared, frame)?;
        self.send(Command::Enqueued(update))
    }

    /// Discard an open sketch without producing a frame.
    pub fn abandon_frame(&self, sketch: Sketch) -> Result<()> {
        abandon_shared(&self.shared, sketch)
    }

    /// Announce how many display slots the producer expects to fill.
    pub fn set_estimated_frame_count(&self, total: u64) -> Result<()> {
        self.shared.progress.lock()?.set_estimated_total(total);
        Ok(())
    }

    /// Declare the frame stream complete.
    pub fn mark_fully_loaded(&self) -> Result<()> {
        self.send(Command::MarkFullyLoaded)
    }

    // === Transport surface, any thread ===

    pub fn play(&self) -> Result<()> {
        self.send(Command::Play)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(Command::Stop)
    }

    pub fn step_back(&self, n: usize) -> Result<()> {
        self.send(Command::StepBack(n))
    }

    pub fn step_forward(&self, n: usize) -> Result<()> {
        self.send(Command::StepForward(n))
    }

    pub fn seek_to_percent(&self, pct: u8) -> Result<()> {
        self.send(Command::SeekToPercent(pct))
    }

    /// Drop every frame and return the player to its unstarted phase.
    pub fn reset(&self) -> Result<()> {
        self.send(Command::Reset)
    }

    // === Queries, any thread ===

    pub fn is_loaded(&self) -> bool {
        self.shared
            .queue
            .lock()
            .map(|q| q.is_fully_loaded())
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

    pub fn position_percent(&self) -> u8 {
        self.shared
            .queue
            .lock()
            .map(|q| q.position_percent())
            .unwrap_or_default()
    }

    /// Stop the playback thread and wait for it to exit.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        let _ = self.tx.send(Command::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| Error::state("scheduler thread is no longer running"))
    }
}

impl Drop for PlayerHandle {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

fn scheduler_loop(mut player: Player, rx: Receiver<Command>) {
    debug!("scheduler thread started");
    let interval = player.tick_interval().unwrap_or(IDLE_WAIT);
    let mut next_tick = Instant::now() + interval;
    let mut was_running = player.is_running();
    loop {
        let wait = if player.is_running() {
            next_tick.saturating_duration_since(Instant::now())
        } else {
            IDLE_WAIT
        };
        match rx.recv_timeout(wait) {
            Ok(Command::Shutdown) => break,
            Ok(command) => {
                if let Err(err) = apply_command(&mut player, command) {
                    warn!(error = %err, "scheduler command failed");
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        // re-arm the deadline when playback starts
        if player.is_running() && !was_running {
            next_tick = Instant::now() + interval;
        }
        was_running = player.is_running();
        if player.is_running() && Instant::now() >= next_tick {
            if let Err(err) = player.tick() {
                warn!(error = %err, "tick failed");
            }
            next_tick += interval;
        }
    }
    debug!("scheduler thread stopped");
}

fn apply_command(player: &mut Player, command: Command) -> Result<()> {
    match command {
        Command::Play => player.play(),
        Command::Stop => player.stop(),
        Command::StepBack(n) => player.step_back(n).map(|_| ()),
        Command::StepForward(n) => player.step_forward(n).map(|_| ()),
        Command::SeekToPercent(pct) => player.seek_to_percent(pct).map(|_| ()),
        Command::MarkFullyLoaded => player.mark_fully_loaded(),
        Command::Enqueued(update) => player.after_enqueue(update),
        Command::Reset => player.reset(),
        // consumed by the loop before dispatch
        Command::Shutdown => Ok(()),
    }
}
