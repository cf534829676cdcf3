//! Playback modes and clock configuration.
//!
//! The mode is fixed when a player is created and decides whether played
//! frames are retained, whether playback starts by itself once loading
//! completes, and which transport controls a host should offer. The clock
//! configuration is supplied exactly once; repeating it with identical
//! values is a no-op, differing values are rejected so a half-played
//! sequence can never change shape mid-flight.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Playback mode, fixed at player construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Play as soon as loading completes; the host shows no controls.
    AutoRunNoControls,
    /// Play as soon as loading completes; pause and resume only.
    AutoRun,
    /// Auto-run, and rewind for another pass when the sequence ends.
    AutoRunReplayable,
    /// Wait for an explicit play once loading completes.
    StartPaused,
    /// Start paused, and rewind for another pass when the sequence ends.
    StartPausedReplayable,
    /// Start paused with frame stepping, seeking, and snapshots enabled.
    StartPausedSelectable,
}

impl Mode {
    /// Whether played frames stay queued for replay or backward stepping.
    pub fn keeps_frames(self) -> bool {
        matches!(
            self,
            Mode::AutoRunReplayable | Mode::StartPausedReplayable | Mode::StartPausedSelectable
        )
    }

    /// Whether playback starts automatically when loading completes.
    pub fn auto_runs(self) -> bool {
        matches!(
            self,
            Mode::AutoRunNoControls | Mode::AutoRun | Mode::AutoRunReplayable
        )
    }

    /// Whether the host should offer transport controls at all.
    pub fn has_controls(self) -> bool {
        self != Mode::AutoRunNoControls
    }

    /// Whether stepping, seeking, and snapshots are available.
    pub fn is_selectable(self) -> bool {
        self == Mode::StartPausedSelectable
    }
}

/// Frame geometry and timing, set exactly once per player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Playback rate in frames per second.
    pub frame_rate: f64,
    /// Whether frames carry an alpha channel.
    pub alpha: bool,
}

impl ClockConfig {
    /// Validate and build a configuration.
    ///
    /// # Arguments
    /// * `width` - Frame width in pixels (nonzero)
    /// * `height` - Frame height in pixels (nonzero)
    /// * `frame_rate` - Frames per second (finite and positive)
    pub fn new(width: u32, height: u32, frame_rate: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::configuration(format!(
                "frame dimensions must be nonzero, got {width}x{height}"
            )));
        }
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(Error::configuration(format!(
                "frame rate must be finite and positive, got {frame_rate}"
            )));
        }
        Ok(Self {
            width,
            height,
            frame_rate,
            alpha: false,
        })
    }

    /// Request an alpha channel on every frame.
    pub fn with_alpha(mut self, alpha: bool) -> Self {
        self.alpha = alpha;
        self
    }

    /// Tick period: 1000 / rate, rounded to whole milliseconds.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis((1000.0 / self.frame_rate).round() as u64)
    }
}
