//! Replay and live painting of strokes onto a [`Surface`].
//!
//! Two paths exist. [`RenderEngine::full_repaint`] wipes the surface and
//! replays the whole history; it costs O(total points) and runs only after
//! undo, redo and clear. [`RenderEngine::incremental_paint`] paints a single
//! segment of the gesture in progress and runs once per pointer move.

use crate::stroke::{Stroke, StrokeShape};
use crate::surface::{LineCap, Surface};
use crate::tools::{StyleSnapshot, TEXT_FONT_FAMILY};
use kurbo::Point;
use std::f64::consts::TAU;

/// Paints strokes using only the primitives of [`Surface`].
#[derive(Debug, Clone)]
pub struct RenderEngine {
    line_cap: LineCap,
    font_family: String,
}

impl Default for RenderEngine {
    fn default() -> Self {
        Self {
            line_cap: LineCap::Round,
            font_family: TEXT_FONT_FAMILY.to_string(),
        }
    }
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Clear the surface and replay every stroke in order, each with its own
    /// recorded style.
    pub fn full_repaint<S: Surface + ?Sized>(&self, strokes: &[Stroke], surface: &mut S) {
        surface.clear();
        for stroke in strokes {
            self.paint_stroke(stroke, surface);
        }
        log::debug!("Repainted {} strokes", strokes.len());
    }

    /// Paint one committed stroke.
    pub fn paint_stroke<S: Surface + ?Sized>(&self, stroke: &Stroke, surface: &mut S) {
        let style = stroke.style();
        match stroke.shape() {
            StrokeShape::Freehand => self.paint_path(stroke.points(), &style, surface),
            StrokeShape::Circle { center, radius } => {
                self.paint_circle(*center, *radius, &style, surface)
            }
            StrokeShape::Text {
                position,
                content,
                font_size,
            } => self.paint_text(content, *position, *font_size, &style, surface),
        }
    }

    /// Paint the newest segment of a live gesture.
    pub fn incremental_paint<S: Surface + ?Sized>(
        &self,
        from: Point,
        to: Point,
        style: &StyleSnapshot,
        surface: &mut S,
    ) {
        self.apply_stroke_style(style, surface);
        surface.begin_path();
        surface.move_to(from);
        surface.line_to(to);
        surface.stroke();
    }

    /// Stroke a full circle outline.
    pub fn paint_circle<S: Surface + ?Sized>(
        &self,
        center: Point,
        radius: f64,
        style: &StyleSnapshot,
        surface: &mut S,
    ) {
        self.apply_stroke_style(style, surface);
        surface.begin_path();
        surface.arc(center, radius, 0.0, TAU);
        surface.stroke();
    }

    /// Fill a text run with the style color.
    pub fn paint_text<S: Surface + ?Sized>(
        &self,
        content: &str,
        position: Point,
        font_size: f64,
        style: &StyleSnapshot,
        surface: &mut S,
    ) {
        surface.set_font(&self.font(font_size));
        surface.set_fill_color(style.color);
        surface.fill_text(content, position);
    }

    /// CSS font shorthand for a given size.
    pub fn font(&self, font_size: f64) -> String {
        format!("{}px {}", font_size, self.font_family)
    }

    fn paint_path<S: Surface + ?Sized>(&self, points: &[Point], style: &StyleSnapshot, surface: &mut S) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.apply_stroke_style(style, surface);
        surface.begin_path();
        surface.move_to(*first);
        for point in rest {
            surface.line_to(*point);
        }
        surface.stroke();
    }

    fn apply_stroke_style<S: Surface + ?Sized>(&self, style: &StyleSnapshot, surface: &mut S) {
        surface.set_stroke_color(style.color);
        surface.set_line_width(style.width);
        surface.set_line_cap(self.line_cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::surface::{DrawOp, RecordingSurface};

    fn style(color: Rgba, width: f64) -> StyleSnapshot {
        StyleSnapshot::new(color, width)
    }

    #[test]
    fn test_freehand_replay_uses_recorded_style() {
        let red = Rgba::rgb(255, 0, 0);
        let stroke = Stroke::freehand(
            vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(5.0, 5.0)],
            style(red, 3.0),
        )
        .unwrap();
        let mut surface = RecordingSurface::new(20.0, 20.0);

        RenderEngine::new().full_repaint(std::slice::from_ref(&stroke), &mut surface);

        assert_eq!(
            surface.ops(),
            &[
                DrawOp::ClearRect {
                    x: 0.0,
                    y: 0.0,
                    width: 20.0,
                    height: 20.0
                },
                DrawOp::StrokeColor(red),
                DrawOp::LineWidth(3.0),
                DrawOp::LineCap(LineCap::Round),
                DrawOp::BeginPath,
                DrawOp::MoveTo(Point::new(0.0, 0.0)),
                DrawOp::LineTo(Point::new(5.0, 0.0)),
                DrawOp::LineTo(Point::new(5.0, 5.0)),
                DrawOp::Stroke,
            ]
        );
    }

    #[test]
    fn test_circle_replays_as_arc() {
        let stroke = Stroke::circle(Point::ZERO, Point::new(3.0, 4.0), style(Rgba::BLACK, 2.0));
        let mut surface = RecordingSurface::new(10.0, 10.0);

        RenderEngine::new().paint_stroke(&stroke, &mut surface);

        assert!(surface.ops().contains(&DrawOp::Arc {
            center: Point::ZERO,
            radius: 5.0,
            start_angle: 0.0,
            end_angle: TAU,
        }));
        assert!(!surface.ops().iter().any(|op| matches!(op, DrawOp::LineTo(_))));
    }

    #[test]
    fn test_text_replay() {
        let stroke = Stroke::text(Point::new(3.0, 9.0), "hello", style(Rgba::BLACK, 5.0)).unwrap();
        let mut surface = RecordingSurface::new(10.0, 10.0);

        RenderEngine::new().paint_stroke(&stroke, &mut surface);

        assert_eq!(
            surface.ops(),
            &[
                DrawOp::Font("25px Arial".to_string()),
                DrawOp::FillColor(Rgba::BLACK),
                DrawOp::FillText {
                    text: "hello".to_string(),
                    position: Point::new(3.0, 9.0)
                },
            ]
        );
    }

    #[test]
    fn test_incremental_paint_single_segment() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        RenderEngine::new().incremental_paint(
            Point::new(1.0, 1.0),
            Point::new(2.0, 3.0),
            &style(Rgba::BLACK, 1.0),
            &mut surface,
        );

        assert_eq!(surface.stroke_count(), 1);
        assert!(!surface.ops().iter().any(|op| matches!(op, DrawOp::ClearRect { .. })));
    }

    #[test]
    fn test_full_repaint_is_idempotent() {
        let strokes = vec![
            Stroke::freehand(vec![Point::ZERO, Point::new(4.0, 4.0)], style(Rgba::BLACK, 2.0)).unwrap(),
            Stroke::circle(Point::new(5.0, 5.0), Point::new(7.0, 5.0), style(Rgba::WHITE, 1.0)),
        ];
        let engine = RenderEngine::new();
        let mut surface = RecordingSurface::new(10.0, 10.0);

        engine.full_repaint(&strokes, &mut surface);
        let first = surface.take_ops();
        engine.full_repaint(&strokes, &mut surface);

        assert_eq!(first, surface.ops());
    }

    #[test]
    fn test_custom_font_family() {
        let engine = RenderEngine::new().with_font_family("Georgia");
        assert_eq!(engine.font(12.0), "12px Georgia");
    }
}
