//! Recorded-frame animation playback.
//!
//! `framecast` records a producer's drawing calls into immutable,
//! replayable frames, queues them, and replays them onto a display
//! surface at a fixed rate with pause, step, seek, and loop-replay.
//!
//! A producer draws each frame into a [`Sketch`] (a [`Canvas`] that logs
//! operations instead of painting); completing the sketch yields an
//! immutable [`Frame`] that can be replayed any number of times with
//! identical output. The [`Player`] buffers frames and drives them onto
//! a host-supplied [`RenderTarget`] under a [`Mode`] chosen at
//! construction; hosts mirror transport state through
//! [`TransportObserver`]. For cross-thread use, [`PlayerHandle`] runs the
//! player on a dedicated scheduler thread.
//!
//! ```no_run
//! use framecast::{ClockConfig, Mode, Canvas, PlayerHandle, TraceTarget};
//!
//! # fn main() -> framecast::Result<()> {
//! let config = ClockConfig::new(320, 240, 30.0)?;
//! let player = PlayerHandle::spawn(Mode::AutoRun, config, TraceTarget::new(320, 240))?;
//!
//! for step in 0..10 {
//!     let mut sketch = player.begin_frame()?;
//!     sketch.clear()?;
//!     sketch.fill_rect(step as f64 * 10.0, 20.0, 10.0, 10.0)?;
//!     player.finish_frame(sketch, 1)?;
//! }
//! player.mark_fully_loaded()?; // playback starts by itself in AutoRun
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod player;
pub mod queue;
pub mod record;
pub mod render;
pub mod sched;

pub use config::{ClockConfig, Mode};
pub use error::{Error, Result};
pub use player::clock::{Hold, TickOutcome};
pub use player::transport::{Controls, Phase, TransportObserver};
pub use player::Player;
pub use queue::FrameQueue;
pub use record::ops::{color_hex, Color, DrawOp};
pub use record::{Frame, FrameRecorder, Sketch};
pub use render::trace::{TraceCanvas, TraceLog, TraceTarget};
pub use render::{Canvas, RenderTarget};
pub use sched::PlayerHandle;
