//! CPU raster implementation of the drawing surface, backed by a tiny-skia pixmap.

use crate::error::{RenderError, RenderResult};
use ab_glyph::{Font, FontRef, PxScale, ScaleFont, point};
use doodlepad_core::{LineCap, Rgba, Surface};
use kurbo::{Arc, BezPath, PathEl, Point, Vec2};
use std::f64::consts::TAU;
use std::fmt;
use tiny_skia::{BlendMode, Color, Mask, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

/// Embedded text face.
static DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

const DEFAULT_FONT: &str = "10px sans-serif";
const DEFAULT_FONT_SIZE: f32 = 10.0;
/// Flattening tolerance for arcs, in pixels.
const ARC_TOLERANCE: f64 = 0.1;

/// An RGBA8 pixmap with canvas-style path state. Pixels start fully
/// transparent.
///
/// Paths are collected as a [`BezPath`] and handed to tiny-skia on `stroke`.
/// Text is laid out on one line with the embedded DejaVu Sans face; the family
/// in the CSS font string is ignored, only the pixel size is honored.
#[derive(Clone)]
pub struct RasterSurface {
    pixmap: Pixmap,
    path: BezPath,
    current: Option<Point>,
    stroke_color: Rgba,
    fill_color: Rgba,
    line_width: f64,
    line_cap: LineCap,
    font: String,
    face: FontRef<'static>,
}

impl fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("stroke_color", &self.stroke_color)
            .field("fill_color", &self.fill_color)
            .field("line_width", &self.line_width)
            .field("line_cap", &self.line_cap)
            .field("font", &self.font)
            .finish_non_exhaustive()
    }
}

impl RasterSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
        Ok(Self {
            pixmap,
            path: BezPath::new(),
            current: None,
            stroke_color: Rgba::BLACK,
            fill_color: Rgba::BLACK,
            line_width: 1.0,
            line_cap: LineCap::default(),
            font: DEFAULT_FONT.to_string(),
            face: FontRef::try_from_slice(DEJAVU_SANS)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Raw RGBA8 bytes, premultiplied alpha.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Read one pixel (straight alpha).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::new(color.red(), color.green(), color.blue(), color.alpha()))
    }

    /// Current CSS font shorthand.
    pub fn font(&self) -> &str {
        &self.font
    }

    fn covers_surface(&self, x: f64, y: f64, width: f64, height: f64) -> bool {
        x <= 0.0 && y <= 0.0 && x + width >= f64::from(self.width()) && y + height >= f64::from(self.height())
    }
}

/// Pixel size from a CSS font shorthand such as `"25px Arial"`.
fn font_size(font: &str) -> f32 {
    font.split_whitespace()
        .find_map(|token| token.strip_suffix("px")?.parse::<f32>().ok())
        .filter(|size| size.is_finite() && *size > 0.0)
        .unwrap_or(DEFAULT_FONT_SIZE)
}

fn solid_paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn skia_cap(cap: LineCap) -> tiny_skia::LineCap {
    match cap {
        LineCap::Butt => tiny_skia::LineCap::Butt,
        LineCap::Round => tiny_skia::LineCap::Round,
        LineCap::Square => tiny_skia::LineCap::Square,
    }
}

/// Convert to a tiny-skia path; `None` when nothing would be stroked.
fn skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

impl Surface for RasterSurface {
    fn size(&self) -> (f64, f64) {
        (f64::from(self.width()), f64::from(self.height()))
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if self.covers_surface(x, y, width, height) {
            self.pixmap.fill(Color::TRANSPARENT);
            return;
        }
        let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            return;
        };
        let mut paint = Paint::default();
        paint.blend_mode = BlendMode::Clear;
        paint.anti_alias = false;
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn begin_path(&mut self) {
        self.path = BezPath::new();
        self.current = None;
    }

    fn move_to(&mut self, point: Point) {
        self.path.move_to(point);
        self.current = Some(point);
    }

    fn line_to(&mut self, point: Point) {
        match self.current {
            Some(_) => self.path.line_to(point),
            None => self.path.move_to(point),
        }
        self.current = Some(point);
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64) {
        if !radius.is_finite() || radius < 0.0 {
            log::warn!("Ignoring arc with radius {}", radius);
            return;
        }
        let delta = end_angle - start_angle;
        let sweep = if delta >= TAU { TAU } else { delta.rem_euclid(TAU) };
        let at = |angle: f64| center + Vec2::from_angle(angle) * radius;

        self.line_to(at(start_angle));
        let arc = Arc {
            center,
            radii: Vec2::new(radius, radius),
            start_angle,
            sweep_angle: sweep,
            x_rotation: 0.0,
        };
        self.path.extend(arc.append_iter(ARC_TOLERANCE));
        self.current = Some(at(start_angle + sweep));
    }

    fn stroke(&mut self) {
        let Some(path) = skia_path(&self.path) else {
            return;
        };
        let stroke = Stroke {
            width: self.line_width as f32,
            line_cap: skia_cap(self.line_cap),
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &solid_paint(self.stroke_color), &stroke, Transform::identity(), None);
    }

    fn fill_text(&mut self, text: &str, position: Point) {
        let (width, height) = (self.width(), self.height());
        let Some(mut mask) = Mask::new(width, height) else {
            return;
        };
        let scaled = self.face.as_scaled(PxScale::from(font_size(&self.font)));
        let coverage = mask.data_mut();
        let mut caret = position.x as f32;
        let mut previous = None;
        let mut inked = false;

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, id);
            }
            let glyph = id.with_scale_and_position(scaled.scale(), point(caret, position.y as f32));
            caret += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = self.face.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, c| {
                let x = bounds.min.x as i64 + i64::from(gx);
                let y = bounds.min.y as i64 + i64::from(gy);
                if (0..i64::from(width)).contains(&x) && (0..i64::from(height)).contains(&y) {
                    let i = y as usize * width as usize + x as usize;
                    let value = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
                    coverage[i] = coverage[i].max(value);
                }
            });
            inked = true;
        }

        if !inked {
            log::debug!("No glyph outlines for {:?}", text);
            return;
        }
        let Some(rect) = Rect::from_xywh(0.0, 0.0, width as f32, height as f32) else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &solid_paint(self.fill_color), Transform::identity(), Some(&mask));
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.fill_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doodlepad_core::{MouseButton, PointerEvent, Sketchpad, ToolbarEvent};
    use pretty_assertions::assert_eq;
    use std::time::{Duration, Instant};

    fn press(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn release(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn inked(surface: &RasterSurface) -> usize {
        surface.pixels().chunks_exact(4).filter(|px| px[3] > 0).count()
    }

    #[test]
    fn test_rejects_empty_surface() {
        assert!(RasterSurface::new(0, 10).is_err());
        assert!(RasterSurface::new(10, 0).is_err());
    }

    #[test]
    fn test_starts_transparent() {
        let surface = RasterSurface::new(4, 4).unwrap();
        assert_eq!(surface.pixel(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(surface.pixel(4, 0), None);
        assert_eq!(surface.pixels().len(), 64);
    }

    #[test]
    fn test_font_size() {
        assert_eq!(font_size("25px Arial"), 25.0);
        assert_eq!(font_size("bold 12.5px serif"), 12.5);
        assert_eq!(font_size("Arial"), DEFAULT_FONT_SIZE);
        assert_eq!(font_size("0px Arial"), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_stroke_covers_line() {
        let mut surface = RasterSurface::new(20, 20).unwrap();
        surface.set_stroke_color(Rgba::rgb(255, 0, 0));
        surface.set_line_width(3.0);
        surface.set_line_cap(LineCap::Round);
        surface.begin_path();
        surface.move_to(Point::new(2.0, 10.0));
        surface.line_to(Point::new(18.0, 10.0));
        surface.stroke();

        assert_eq!(surface.pixel(10, 9), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(surface.pixel(10, 2), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_single_point_path_draws_nothing() {
        let mut surface = RasterSurface::new(10, 10).unwrap();
        surface.set_line_width(4.0);
        surface.begin_path();
        surface.move_to(Point::new(5.0, 5.0));
        surface.stroke();
        assert!(surface.pixels().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_arc_outline() {
        let mut surface = RasterSurface::new(40, 40).unwrap();
        surface.set_line_width(2.0);
        surface.begin_path();
        surface.arc(Point::new(20.0, 20.0), 10.0, 0.0, TAU);
        surface.stroke();

        // On the ring, not in the middle.
        assert!(surface.pixel(30, 20).is_some_and(|p| p.a > 128));
        assert!(surface.pixel(20, 9).is_some_and(|p| p.a > 128));
        assert_eq!(surface.pixel(20, 20), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_clear_rect() {
        let mut surface = RasterSurface::new(10, 10).unwrap();
        surface.set_line_width(10.0);
        surface.begin_path();
        surface.move_to(Point::new(0.0, 5.0));
        surface.line_to(Point::new(10.0, 5.0));
        surface.stroke();
        assert!(surface.pixels().iter().any(|b| *b != 0));

        surface.clear_rect(0.0, 0.0, 5.0, 10.0);
        assert_eq!(surface.pixel(2, 5), Some(Rgba::TRANSPARENT));
        assert_eq!(surface.pixel(7, 5), Some(Rgba::BLACK));

        surface.clear();
        assert!(surface.pixels().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_fill_text_marks_pixels() {
        let mut surface = RasterSurface::new(80, 40).unwrap();
        surface.set_font("24px Arial");
        surface.set_fill_color(Rgba::rgb(255, 0, 0));
        surface.fill_text("Hi", Point::new(5.0, 30.0));

        assert!(inked(&surface) > 20);
        let solid = (0..40)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .filter_map(|(x, y)| surface.pixel(x, y))
            .any(|p| p == Rgba::rgb(255, 0, 0));
        assert!(solid);
        // Glyphs sit above the baseline.
        assert!((0..80).all(|x| surface.pixel(x, 39) == Some(Rgba::TRANSPARENT)));
    }

    #[test]
    fn test_blank_text_draws_nothing() {
        let mut surface = RasterSurface::new(40, 20).unwrap();
        surface.fill_text("   ", Point::new(2.0, 15.0));
        assert_eq!(inked(&surface), 0);
    }

    #[test]
    fn test_text_stroke_changes_pixels() {
        let mut pad = Sketchpad::new();
        let mut surface = RasterSurface::new(120, 60).unwrap();
        pad.handle_toolbar(&ToolbarEvent::click("textTool"), &mut surface);
        assert!(pad.handle_click(Point::new(10.0, 40.0), &mut surface, || Some("Hello".into())));
        let with_text = inked(&surface);
        assert!(with_text > 0);

        pad.repaint(&mut surface);
        assert_eq!(inked(&surface), with_text);
        pad.undo(&mut surface);
        assert_eq!(inked(&surface), 0);
    }

    #[test]
    fn test_undo_restores_pixels() {
        let mut pad = Sketchpad::new();
        let mut surface = RasterSurface::new(50, 50).unwrap();

        pad.handle_pointer(&press(5.0, 5.0), &mut surface);
        pad.handle_pointer(&PointerEvent::Move { position: Point::new(45.0, 5.0) }, &mut surface);
        pad.handle_pointer(&release(45.0, 5.0), &mut surface);
        pad.repaint(&mut surface);
        let one_stroke = surface.pixels().to_vec();

        pad.handle_toolbar(&ToolbarEvent::change("stroke", "#3366ff"), &mut surface);
        pad.handle_pointer(&press(5.0, 30.0), &mut surface);
        pad.handle_pointer(&PointerEvent::Move { position: Point::new(45.0, 30.0) }, &mut surface);
        pad.handle_pointer(&release(45.0, 30.0), &mut surface);
        assert_ne!(surface.pixels(), one_stroke.as_slice());

        pad.undo(&mut surface);
        assert_eq!(surface.pixels(), one_stroke.as_slice());
    }

    #[test]
    fn test_repaint_idempotent_pixels() {
        let mut pad = Sketchpad::new();
        let mut surface = RasterSurface::new(30, 30).unwrap();
        pad.handle_toolbar(&ToolbarEvent::click("circle"), &mut surface);
        pad.handle_pointer(&press(15.0, 15.0), &mut surface);
        pad.handle_pointer(&PointerEvent::Move { position: Point::new(15.0, 25.0) }, &mut surface);
        pad.handle_pointer(&release(15.0, 25.0), &mut surface);

        pad.repaint(&mut surface);
        let first = surface.pixels().to_vec();
        pad.repaint(&mut surface);
        assert_eq!(surface.pixels(), first.as_slice());
    }

    #[test]
    fn test_undo_with_large_circles_on_full_canvas() {
        let mut pad = Sketchpad::new();
        let mut surface = RasterSurface::new(1280, 800).unwrap();
        pad.handle_toolbar(&ToolbarEvent::click("circle"), &mut surface);
        for cx in [400.0, 640.0, 880.0] {
            pad.handle_pointer(&press(cx, 400.0), &mut surface);
            pad.handle_pointer(&PointerEvent::Move { position: Point::new(cx + 350.0, 400.0) }, &mut surface);
            pad.handle_pointer(&release(cx + 350.0, 400.0), &mut surface);
        }
        assert_eq!(pad.history().len(), 3);

        let started = Instant::now();
        assert!(pad.undo(&mut surface));
        assert!(started.elapsed() < Duration::from_secs(2));

        // Left edge of the first circle survives, right edge of the last is gone.
        assert!(surface.pixel(50, 400).is_some_and(|p| p.a > 0));
        assert_eq!(surface.pixel(1230, 400), Some(Rgba::TRANSPARENT));
    }
}
