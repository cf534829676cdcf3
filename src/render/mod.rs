//! Render contracts.
//!
//! [`Canvas`] is the drawing vocabulary shared by recording and playback:
//! the recorder's sketch implements it by appending ops to a log, host
//! surfaces implement it by painting. [`RenderTarget`] brackets whole
//! frames and hands out the canvas they are drawn on.
//!
//! [`trace`] provides an in-crate target that records the calls it
//! receives as printable lines, used by tests and as a debugging aid.

pub mod trace;

use crate::error::Result;
use crate::record::ops::Color;

/// A drawing surface accepting the recorded op vocabulary.
///
/// Replay invokes these methods in recorded order. Implementations report
/// failures with [`crate::Error::render`]; the replay loop stamps the
/// failing op's index onto the error before surfacing it.
pub trait Canvas {
    /// Surface width in pixels.
    fn width(&self) -> u32;
    /// Surface height in pixels.
    fn height(&self) -> u32;
    /// Whether the surface honors alpha.
    fn supports_alpha(&self) -> bool;

    fn clear(&mut self) -> Result<()>;
    fn set_color(&mut self, color: Color) -> Result<()>;
    fn set_background(&mut self, color: Color) -> Result<()>;
    fn set_stroke_width(&mut self, width: f64) -> Result<()>;
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()>;
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()>;
    fn fill_oval(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()>;
    fn stroke_oval(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()>;
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()>;
    fn polyline(&mut self, points: &[(f64, f64)]) -> Result<()>;
    fn fill_polygon(&mut self, points: &[(f64, f64)]) -> Result<()>;
    fn text(&mut self, text: &str, x: f64, y: f64) -> Result<()>;
    fn translate(&mut self, dx: f64, dy: f64) -> Result<()>;
    fn scale(&mut self, sx: f64, sy: f64) -> Result<()>;
    fn rotate(&mut self, radians: f64) -> Result<()>;
    /// Push the current paint and transform state.
    fn save(&mut self) -> Result<()>;
    /// Pop back to the most recently saved state.
    fn restore(&mut self) -> Result<()>;
}

/// A display surface that presents replayed frames.
///
/// The clock brackets every replay between [`begin_frame`] and
/// [`end_frame`]; a host typically clears or flips its backing buffer in
/// the bracket calls. Targets move onto the scheduler thread, hence
/// `Send`.
///
/// [`begin_frame`]: RenderTarget::begin_frame
/// [`end_frame`]: RenderTarget::end_frame
pub trait RenderTarget: Send {
    /// Target width in pixels.
    fn width(&self) -> u32;
    /// Target height in pixels.
    fn height(&self) -> u32;
    /// Whether the target honors alpha.
    fn supports_alpha(&self) -> bool;
    /// Start a frame and return the canvas to draw it on.
    fn begin_frame(&mut self) -> Result<&mut dyn Canvas>;
    /// Present the frame started by the last [`begin_frame`].
    ///
    /// [`begin_frame`]: RenderTarget::begin_frame
    fn end_frame(&mut self) -> Result<()>;
}
