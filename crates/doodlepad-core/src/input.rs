//! Pointer and keyboard events, and the per-gesture capture state machine.

use crate::render::RenderEngine;
use crate::stroke::Stroke;
use crate::surface::Surface;
use crate::tools::{StyleSnapshot, ToolKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        ctrl: true,
        alt: false,
        meta: false,
    };
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    Up {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    /// Press and release at the same spot (used by text mode).
    Click {
        position: Point,
    },
}

/// A key press with the modifiers held at the time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// State of the gesture in progress.
#[derive(Debug, Clone, Default)]
pub enum GestureState {
    /// No pointer is held down.
    #[default]
    Idle,
    /// A pointer is held down and a stroke is being captured.
    Dragging {
        /// Tool the gesture started with.
        tool: ToolKind,
        /// Style frozen when the gesture started.
        style: StyleSnapshot,
        /// Where the pointer went down.
        start: Point,
        /// Most recent live point, the origin of the next painted segment.
        last: Point,
        /// Points recorded so far (freehand tools only).
        points: Vec<Point>,
        /// Whether any move arrived since the press.
        moved: bool,
    },
}

/// Turns press/move/release sequences into committed strokes.
///
/// Freehand tools record the press point and one point per move, painting
/// each new segment immediately. The circle tool paints nothing until release.
#[derive(Debug, Clone, Default)]
pub struct InputCapture {
    state: GestureState,
}

impl InputCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Start a gesture. Ignored for tools that do not draw by dragging.
    pub fn press(&mut self, position: Point, tool: ToolKind, style: StyleSnapshot) {
        if !tool.uses_gestures() {
            return;
        }
        if self.is_dragging() {
            log::warn!("Pointer pressed during an active gesture, restarting");
        }
        let points = if tool.is_freehand() {
            vec![position]
        } else {
            Vec::new()
        };
        self.state = GestureState::Dragging {
            tool,
            style,
            start: position,
            last: position,
            points,
            moved: false,
        };
    }

    /// Extend the gesture to `position`, painting the new segment live.
    pub fn drag<S: Surface + ?Sized>(&mut self, position: Point, engine: &RenderEngine, surface: &mut S) {
        if let GestureState::Dragging {
            tool,
            style,
            last,
            points,
            moved,
            ..
        } = &mut self.state
        {
            *moved = true;
            if !tool.is_freehand() {
                return;
            }
            engine.incremental_paint(*last, position, style, surface);
            points.push(position);
            *last = position;
        }
    }

    /// Finish the gesture and return the stroke to commit, if anything was drawn.
    pub fn release<S: Surface + ?Sized>(
        &mut self,
        position: Point,
        engine: &RenderEngine,
        surface: &mut S,
    ) -> Option<Stroke> {
        let GestureState::Dragging {
            tool,
            style,
            start,
            points,
            moved,
            ..
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };

        if tool == ToolKind::Circle {
            if !moved && position == start {
                log::debug!("Circle gesture without motion, nothing committed");
                return None;
            }
            let stroke = Stroke::circle(start, position, style);
            engine.paint_stroke(&stroke, surface);
            return Some(stroke);
        }

        // The press point alone is a click, not a stroke.
        if points.len() < 2 {
            log::debug!("Freehand gesture without motion, nothing committed");
            return None;
        }
        Stroke::freehand(points, style)
    }

    /// Abandon the gesture in progress without committing anything.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }
}
