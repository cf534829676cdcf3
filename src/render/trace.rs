//! Op-trace render target.
//!
//! [`TraceCanvas`] logs every canvas call as one printable line instead of
//! painting, so two replays can be compared verbatim and snapshotted.
//! [`TraceTarget`] wraps it as a full render target with frame markers and
//! an injectable per-frame failure for exercising skip paths. The log
//! lives behind a shared handle ([`TraceLog`]) so tests keep access after
//! the target moves into a player.

use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::record::ops::{color_hex, Color};

use super::{Canvas, RenderTarget};

#[derive(Debug, Default)]
struct LogInner {
    lines: Vec<String>,
    frames_begun: usize,
    frames_ended: usize,
    fail_on_frame: Option<usize>,
    fail_pending: bool,
}

/// Shared handle to a trace log.
///
/// Clones observe the same log, so a handle taken before the target moves
/// onto the scheduler thread still sees everything rendered afterwards.
#[derive(Debug, Clone, Default)]
pub struct TraceLog(Arc<Mutex<LogInner>>);

impl TraceLog {
    /// All recorded lines, frame markers included.
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().map(|g| g.lines.clone()).unwrap_or_default()
    }

    /// The lines joined with newlines, for snapshots.
    pub fn joined(&self) -> String {
        self.lines().join("\n")
    }

    /// Number of frames fully presented (begin and end both seen).
    pub fn rendered_frames(&self) -> usize {
        self.0.lock().map(|g| g.frames_ended).unwrap_or_default()
    }

    /// Make the first op of the `n`-th frame (1-based) fail.
    pub fn fail_on_frame(&self, n: usize) {
        if let Ok(mut g) = self.0.lock() {
            g.fail_on_frame = Some(n);
        }
    }

    fn push(&self, line: String) -> Result<()> {
        let mut g = self.0.lock()?;
        if g.fail_pending {
            g.fail_pending = false;
            return Err(Error::render("injected paint failure"));
        }
        g.lines.push(line);
        Ok(())
    }

    fn push_marker(&self, line: String) -> Result<()> {
        self.0.lock()?.lines.push(line);
        Ok(())
    }

    fn begin_frame(&self) -> Result<usize> {
        let mut g = self.0.lock()?;
        g.frames_begun += 1;
        if g.fail_on_frame == Some(g.frames_begun) {
            g.fail_pending = true;
        }
        Ok(g.frames_begun)
    }

    fn end_frame(&self) -> Result<()> {
        self.0.lock()?.frames_ended += 1;
        Ok(())
    }
}

/// A canvas that logs each call instead of painting.
#[derive(Debug)]
pub struct TraceCanvas {
    log: TraceLog,
    width: u32,
    height: u32,
    alpha: bool,
}

impl TraceCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            log: TraceLog::default(),
            width,
            height,
            alpha: false,
        }
    }

    /// Shared handle to this canvas's log.
    pub fn log(&self) -> TraceLog {
        self.log.clone()
    }

    /// Lines recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.log.lines()
    }
}

impl Canvas for TraceCanvas {
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
        self.log.push("clear".into())
    }

    fn set_color(&mut self, color: Color) -> Result<()> {
        self.log.push(format!("set_color {}", color_hex(color)))
    }

    fn set_background(&mut self, color: Color) -> Result<()> {
        self.log.push(format!("set_background {}", color_hex(color)))
    }

    fn set_stroke_width(&mut self, width: f64) -> Result<()> {
        self.log.push(format!("set_stroke_width {width}"))
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.log.push(format!("fill_rect {x} {y} {w} {h}"))
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.log.push(format!("stroke_rect {x} {y} {w} {h}"))
    }

    fn fill_oval(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.log.push(format!("fill_oval {x} {y} {w} {h}"))
    }

    fn stroke_oval(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.log.push(format!("stroke_oval {x} {y} {w} {h}"))
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        self.log.push(format!("line {x1} {y1} {x2} {y2}"))
    }

    fn polyline(&mut self, points: &[(f64, f64)]) -> Result<()> {
        self.log.push(format!("polyline {points:?}"))
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)]) -> Result<()> {
        self.log.push(format!("fill_polygon {points:?}"))
    }

    fn text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.log.push(format!("text {text:?} {x} {y}"))
    }

    fn translate(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.log.push(format!("translate {dx} {dy}"))
    }

    fn scale(&mut self, sx: f64, sy: f64) -> Result<()> {
        self.log.push(format!("scale {sx} {sy}"))
    }

    fn rotate(&mut self, radians: f64) -> Result<()> {
        self.log.push(format!("rotate {radians}"))
    }

    fn save(&mut self) -> Result<()> {
        self.log.push("save".into())
    }

    fn restore(&mut self) -> Result<()> {
        self.log.push("restore".into())
    }
}

/// A render target that records frames as op traces.
#[derive(Debug)]
pub struct TraceTarget {
    canvas: TraceCanvas,
}

impl TraceTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: TraceCanvas::new(width, height),
        }
    }

    /// Report alpha support to replayed frames.
    pub fn with_alpha(mut self, alpha: bool) -> Self {
        self.canvas.alpha = alpha;
        self
    }

    /// Shared handle to the trace log; take one before moving the target
    /// into a player.
    pub fn log(&self) -> TraceLog {
        self.canvas.log()
    }

    /// Make the first op of the `n`-th rendered frame (1-based) fail.
    pub fn fail_on_frame(&self, n: usize) {
        self.canvas.log.fail_on_frame(n);
    }
}

impl RenderTarget for TraceTarget {
    fn width(&self) -> u32 {
        self.canvas.width
    }

    fn height(&self) -> u32 {
        self.canvas.height
    }

    fn supports_alpha(&self) -> bool {
        self.canvas.alpha
    }

    fn begin_frame(&mut self) -> Result<&mut dyn Canvas> {
        let n = self.canvas.log.begin_frame()?;
        self.canvas.log.push_marker(format!("--- frame {n}"))?;
        Ok(&mut self.canvas)
    }

    fn end_frame(&mut self) -> Result<()> {
        self.canvas.log.end_frame()
    }
}
