//! Frame recording.
//!
//! A producer draws each frame into a [`Sketch`], a canvas that appends to
//! a command log instead of painting. Completing the sketch freezes the
//! log into an immutable [`Frame`]. Completion is the only point at which
//! a frame becomes shareable, so a queued frame can never describe an
//! in-progress drawing.
//!
//! Frames share their op log behind an `Arc`: cloning one is a reference
//! bump, and dropping the last clone releases the recording. That is how
//! unkept frames free their resources right after playback.

pub mod ops;

use std::sync::Arc;

use tracing::debug;

use crate::config::ClockConfig;
use crate::error::{Error, Result};
use crate::render::Canvas;

use ops::{Color, DrawOp};

/// An immutable recorded frame.
///
/// `repetition` is the number of ticks the frame stays on screen; zero
/// means the clock consumes the frame without ever showing it. `keep`
/// marks frames that remain queued after playback for replay and backward
/// stepping.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    ops: Arc<[DrawOp]>,
    repetition: u32,
    keep: bool,
}

impl Frame {
    #[cfg(test)]
    pub(crate) fn from_ops(ops: Vec<DrawOp>, repetition: u32, keep: bool) -> Self {
        Self {
            ops: ops.into(),
            repetition,
            keep,
        }
    }

    /// Number of ticks this frame occupies during playback.
    pub fn repetition_count(&self) -> u32 {
        self.repetition
    }

    /// Whether the queue retains this frame after it has played.
    pub fn is_kept(&self) -> bool {
        self.keep
    }

    /// Number of recorded ops.
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// The recorded op log.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Re-execute the recorded ops against a canvas.
    ///
    /// Pure with respect to the recording: any number of replays against
    /// fresh targets produce the same call sequence. A failing op aborts
    /// this replay with the op's index stamped on the error; the recording
    /// itself is unaffected and can be replayed again.
    pub fn replay(&self, canvas: &mut dyn Canvas) -> Result<()> {
        for (index, op) in self.ops.iter().enumerate() {
            op.apply_to(canvas).map_err(|e| e.at_op(index))?;
        }
        Ok(())
    }
}

/// A canvas that records instead of painting.
///
/// Obtained from [`FrameRecorder::begin`]; every drawing call appends one
/// op to the frame under construction and cannot fail. The sketch reports
/// the configured frame geometry so producer code can lay out against the
/// real dimensions.
#[derive(Debug)]
pub struct Sketch {
    ops: Vec<DrawOp>,
    width: u32,
    height: u32,
    alpha: bool,
}

impl Sketch {
    fn new(config: &ClockConfig) -> Self {
        Self {
            ops: Vec::new(),
            width: config.width,
            height: config.height,
            alpha: config.alpha,
        }
    }

    /// Ops recorded so far.
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }
}

impl Canvas for Sketch {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn supports_alpha(&self) -> bool {
        self.alpha
    }

    fn clear(&mut self) -> Result<()> {
        self.ops.push(DrawOp::Clear);
        Ok(())
    }

    fn set_color(&mut self, color: Color) -> Result<()> {
        self.ops.push(DrawOp::SetColor { color });
        Ok(())
    }

    fn set_background(&mut self, color: Color) -> Result<()> {
        self.ops.push(DrawOp::SetBackground { color });
        Ok(())
    }

    fn set_stroke_width(&mut self, width: f64) -> Result<()> {
        self.ops.push(DrawOp::SetStrokeWidth { width });
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.ops.push(DrawOp::FillRect { x, y, w, h });
        Ok(())
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.ops.push(DrawOp::StrokeRect { x, y, w, h });
        Ok(())
    }

    fn fill_oval(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.ops.push(DrawOp::FillOval { x, y, w, h });
        Ok(())
    }

    fn stroke_oval(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.ops.push(DrawOp::StrokeOval { x, y, w, h });
        Ok(())
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2 });
        Ok(())
    }

    fn polyline(&mut self, points: &[(f64, f64)]) -> Result<()> {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
        });
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)]) -> Result<()> {
        self.ops.push(DrawOp::FillPolygon {
            points: points.to_vec(),
        });
        Ok(())
    }

    fn text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
        });
        Ok(())
    }

    fn translate(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.ops.push(DrawOp::Translate { dx, dy });
        Ok(())
    }

    fn scale(&mut self, sx: f64, sy: f64) -> Result<()> {
        self.ops.push(DrawOp::Scale { sx, sy });
        Ok(())
    }

    fn rotate(&mut self, radians: f64) -> Result<()> {
        self.ops.push(DrawOp::Rotate { radians });
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.ops.push(DrawOp::Save);
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        self.ops.push(DrawOp::Restore);
        Ok(())
    }
}

/// Records frames one at a time.
///
/// At most one sketch may be out at once: [`begin`] while a sketch is open
/// is a state error. [`complete`] freezes the open sketch into a frame and
/// [`abandon`] discards it; either reopens the recorder. A sketch that was
/// dropped without going through either can be cleared with [`reset`].
///
/// [`begin`]: FrameRecorder::begin
/// [`complete`]: FrameRecorder::complete
/// [`abandon`]: FrameRecorder::abandon
/// [`reset`]: FrameRecorder::reset
#[derive(Debug)]
pub struct FrameRecorder {
    config: ClockConfig,
    default_keep: bool,
    open: bool,
}

impl FrameRecorder {
    /// # Arguments
    /// * `config` - Frame geometry the sketches report
    /// * `default_keep` - Keep flag stamped on frames by [`complete`]
    ///
    /// [`complete`]: FrameRecorder::complete
    pub fn new(config: ClockConfig, default_keep: bool) -> Self {
        Self {
            config,
            default_keep,
            open: false,
        }
    }

    /// Open a sketch for the next frame.
    pub fn begin(&mut self) -> Result<Sketch> {
        if self.open {
            return Err(Error::state("a frame sketch is already open"));
        }
        self.open = true;
        Ok(Sketch::new(&self.config))
    }

    /// Freeze an open sketch into an immutable frame.
    ///
    /// The frame carries the recorder's default keep flag; use
    /// [`complete_with_keep`] to override it for one frame.
    ///
    /// [`complete_with_keep`]: FrameRecorder::complete_with_keep
    pub fn complete(&mut self, sketch: Sketch, repetition: u32) -> Frame {
        self.complete_with_keep(sketch, repetition, self.default_keep)
    }

    /// Freeze an open sketch with an explicit keep flag.
    pub fn complete_with_keep(&mut self, sketch: Sketch, repetition: u32, keep: bool) -> Frame {
        self.open = false;
        debug!(ops = sketch.ops.len(), repetition, keep, "frame completed");
        Frame {
            ops: sketch.ops.into(),
            repetition,
            keep,
        }
    }

    /// Discard an open sketch without producing a frame.
    pub fn abandon(&mut self, sketch: Sketch) {
        debug!(ops = sketch.ops.len(), "frame sketch abandoned");
        self.open = false;
    }

    /// Forget an open sketch that was dropped without completing.
    pub fn reset(&mut self) {
        self.open = false;
    }

    /// Whether a sketch is currently out.
    pub fn has_open_sketch(&self) -> bool {
        self.open
    }
}
