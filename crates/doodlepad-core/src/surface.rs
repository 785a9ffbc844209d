//! The 2D raster surface the render engine draws on.
//!
//! The core only ever issues the path primitives below and never touches
//! pixels directly. Browsers back this with a canvas 2D context; native code
//! uses a CPU raster.

use crate::color::Rgba;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Line cap style for stroked paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    /// CSS keyword for this cap.
    pub fn as_str(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

/// Drawing primitives of a raster surface.
///
/// The semantics follow the HTML canvas 2D context: a single current path is
/// built with `begin_path`/`move_to`/`line_to`/`arc` and painted by `stroke`
/// with the current stroke color, width and cap.
pub trait Surface {
    /// Surface size in pixels (width, height).
    fn size(&self) -> (f64, f64);

    /// Reset a rectangle to fully transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn begin_path(&mut self);

    fn move_to(&mut self, point: Point);

    fn line_to(&mut self, point: Point);

    /// Add a circular arc (angles in radians, clockwise in screen space).
    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64);

    /// Stroke the current path.
    fn stroke(&mut self);

    /// Fill `text` with its baseline starting at `position`.
    fn fill_text(&mut self, text: &str, position: Point);

    fn set_stroke_color(&mut self, color: Rgba);

    fn set_fill_color(&mut self, color: Rgba);

    fn set_line_width(&mut self, width: f64);

    fn set_line_cap(&mut self, cap: LineCap);

    /// Set the font as a CSS font shorthand, e.g. `25px Arial`.
    fn set_font(&mut self, font: &str);

    /// Clear the whole surface.
    fn clear(&mut self) {
        let (width, height) = self.size();
        self.clear_rect(0.0, 0.0, width, height);
    }
}

/// A primitive call recorded by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    Arc { center: Point, radius: f64, start_angle: f64, end_angle: f64 },
    Stroke,
    FillText { text: String, position: Point },
    StrokeColor(Rgba),
    FillColor(Rgba),
    LineWidth(f64),
    LineCap(LineCap),
    Font(String),
}

/// Surface that records primitive calls instead of rasterizing them.
///
/// Two identical op sequences produce identical pixels on any conforming
/// surface, which makes this useful for comparing renders.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Take the recorded ops, leaving the recording empty.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Ops recorded since the last full clear.
    pub fn ops_since_clear(&self) -> &[DrawOp] {
        let start = self
            .ops
            .iter()
            .rposition(|op| {
                matches!(op, DrawOp::ClearRect { x, y, width, height }
                    if *x <= 0.0 && *y <= 0.0 && *width >= self.width && *height >= self.height)
            })
            .unwrap_or(0);
        &self.ops[start..]
    }

    /// Number of `Stroke` ops recorded.
    pub fn stroke_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Stroke)).count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::ClearRect { x, y, width, height });
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, point: Point) {
        self.ops.push(DrawOp::MoveTo(point));
    }

    fn line_to(&mut self, point: Point) {
        self.ops.push(DrawOp::LineTo(point));
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64) {
        self.ops.push(DrawOp::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn fill_text(&mut self, text: &str, position: Point) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            position,
        });
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.ops.push(DrawOp::StrokeColor(color));
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.ops.push(DrawOp::FillColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ops.push(DrawOp::LineCap(cap));
    }

    fn set_font(&mut self, font: &str) {
        self.ops.push(DrawOp::Font(font.to_string()));
    }
}
