//! The recorded drawing vocabulary.
//!
//! A frame is an ordered log of these ops: recording appends them, replay
//! walks the log and calls the matching canvas method. The set mirrors
//! what a 2D surface host must support: paint state, primitive shapes,
//! text, affine transforms, and graphics-state save/restore.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::Canvas;

/// An RGBA color carried by paint ops.
pub type Color = rgb::RGBA8;

/// Format a color as `#rrggbbaa` for traces and logs.
pub fn color_hex(color: Color) -> String {
    format!(
        "#{:02x}{:02x}{:02x}{:02x}",
        color.r, color.g, color.b, color.a
    )
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Clear the whole frame to the current background.
    Clear,
    /// Select the paint color for subsequent shape and text ops.
    SetColor { color: Color },
    /// Select the background used by `Clear`.
    SetBackground { color: Color },
    /// Select the stroke width for outline ops.
    SetStrokeWidth { width: f64 },
    FillRect { x: f64, y: f64, w: f64, h: f64 },
    StrokeRect { x: f64, y: f64, w: f64, h: f64 },
    FillOval { x: f64, y: f64, w: f64, h: f64 },
    StrokeOval { x: f64, y: f64, w: f64, h: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Polyline { points: Vec<(f64, f64)> },
    FillPolygon { points: Vec<(f64, f64)> },
    Text { text: String, x: f64, y: f64 },
    Translate { dx: f64, dy: f64 },
    Scale { sx: f64, sy: f64 },
    Rotate { radians: f64 },
    /// Push the current paint and transform state.
    Save,
    /// Pop back to the most recently saved state.
    Restore,
}

impl DrawOp {
    /// Short op name used in traces and logs.
    pub fn name(&self) -> &'static str {
        match self {
            DrawOp::Clear => "clear",
            DrawOp::SetColor { .. } => "set_color",
            DrawOp::SetBackground { .. } => "set_background",
            DrawOp::SetStrokeWidth { .. } => "set_stroke_width",
            DrawOp::FillRect { .. } => "fill_rect",
            DrawOp::StrokeRect { .. } => "stroke_rect",
            DrawOp::FillOval { .. } => "fill_oval",
            DrawOp::StrokeOval { .. } => "stroke_oval",
            DrawOp::Line { .. } => "line",
            DrawOp::Polyline { .. } => "polyline",
            DrawOp::FillPolygon { .. } => "fill_polygon",
            DrawOp::Text { .. } => "text",
            DrawOp::Translate { .. } => "translate",
            DrawOp::Scale { .. } => "scale",
            DrawOp::Rotate { .. } => "rotate",
            DrawOp::Save => "save",
            DrawOp::Restore => "restore",
        }
    }

    /// Replay this op against a canvas.
    pub fn apply_to(&self, canvas: &mut dyn Canvas) -> Result<()> {
        match self {
            DrawOp::Clear => canvas.clear(),
            DrawOp::SetColor { color } => canvas.set_color(*color),
            DrawOp::SetBackground { color } => canvas.set_background(*color),
            DrawOp::SetStrokeWidth { width } => canvas.set_stroke_width(*width),
            DrawOp::FillRect { x, y, w, h } => canvas.fill_rect(*x, *y, *w, *h),
            DrawOp::StrokeRect { x, y, w, h } => canvas.stroke_rect(*x, *y, *w, *h),
            DrawOp::FillOval { x, y, w, h } => canvas.fill_oval(*x, *y, *w, *h),
            DrawOp::StrokeOval { x, y, w, h } => canvas.stroke_oval(*x, *y, *w, *h),
            DrawOp::Line { x1, y1, x2, y2 } => canvas.line(*x1, *y1, *x2, *y2),
            DrawOp::Polyline { points } => canvas.polyline(points),
            DrawOp::FillPolygon { points } => canvas.fill_polygon(points),
            DrawOp::Text { text, x, y } => canvas.text(text, *x, *y),
            DrawOp::Translate { dx, dy } => canvas.translate(*dx, *dy),
            DrawOp::Scale { sx, sy } => canvas.scale(*sx, *sy),
            DrawOp::Rotate { radians } => canvas.rotate(*radians),
            DrawOp::Save => canvas.save(),
            DrawOp::Restore => canvas.restore(),
        }
    }
}
