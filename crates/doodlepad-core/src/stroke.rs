//! Committed drawing operations.

use crate::color::Rgba;
use crate::tools::StyleSnapshot;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for strokes.
pub type StrokeId = Uuid;

/// How a stroke is replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrokeShape {
    /// Connected segments through every recorded point.
    Freehand,
    /// A full circle outline.
    Circle { center: Point, radius: f64 },
    /// A filled text run anchored at its baseline start.
    Text {
        position: Point,
        content: String,
        font_size: f64,
    },
}

/// One immutable committed drawing operation.
///
/// Strokes are only built through the constructors below, which refuse to
/// produce a stroke without points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    id: StrokeId,
    points: Vec<Point>,
    color: Rgba,
    width: f64,
    shape: StrokeShape,
}

impl Stroke {
    /// A freehand path. Returns `None` for an empty point list.
    pub fn freehand(points: Vec<Point>, style: StyleSnapshot) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            points,
            color: style.color,
            width: style.width,
            shape: StrokeShape::Freehand,
        })
    }

    /// A circle dragged out from `center` to `edge`.
    pub fn circle(center: Point, edge: Point, style: StyleSnapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![center, edge],
            color: style.color,
            width: style.width,
            shape: StrokeShape::Circle {
                center,
                radius: center.distance(edge),
            },
        }
    }

    /// A text insertion. Returns `None` when there is nothing to write.
    pub fn text(position: Point, content: impl Into<String>, style: StyleSnapshot) -> Option<Self> {
        let content = content.into();
        if content.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            points: vec![position],
            color: style.color,
            width: style.width,
            shape: StrokeShape::Text {
                position,
                content,
                font_size: style.font_size(),
            },
        })
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn shape(&self) -> &StrokeShape {
        &self.shape
    }

    /// The style this stroke was committed with.
    pub fn style(&self) -> StyleSnapshot {
        StyleSnapshot::new(self.color, self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> StyleSnapshot {
        StyleSnapshot::new(Rgba::BLACK, 5.0)
    }

    #[test]
    fn test_freehand_requires_points() {
        assert!(Stroke::freehand(Vec::new(), style()).is_none());

        let stroke = Stroke::freehand(vec![Point::new(1.0, 2.0)], style()).unwrap();
        assert_eq!(stroke.len(), 1);
        assert_eq!(stroke.shape(), &StrokeShape::Freehand);
    }

    #[test]
    fn test_circle_radius() {
        let stroke = Stroke::circle(Point::ZERO, Point::new(3.0, 4.0), style());
        assert_eq!(
            stroke.shape(),
            &StrokeShape::Circle {
                center: Point::ZERO,
                radius: 5.0
            }
        );
        assert_eq!(stroke.points().len(), 2);
    }

    #[test]
    fn test_text_font_size_follows_width() {
        let stroke = Stroke::text(Point::new(4.0, 4.0), "hi", StyleSnapshot::new(Rgba::BLACK, 4.0)).unwrap();
        match stroke.shape() {
            StrokeShape::Text { font_size, content, .. } => {
                assert_eq!(*font_size, 20.0);
                assert_eq!(content, "hi");
            }
            other => panic!("unexpected shape {other:?}"),
        }
        assert!(Stroke::text(Point::ZERO, "", style()).is_none());
    }

    #[test]
    fn test_strokes_get_distinct_ids() {
        let a = Stroke::freehand(vec![Point::ZERO], style()).unwrap();
        let b = Stroke::freehand(vec![Point::ZERO], style()).unwrap();
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }
}
