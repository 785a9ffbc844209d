//! Doodlepad Core Library
//!
//! Platform-agnostic drawing model for the Doodlepad canvas: the stroke
//! history with undo/redo, the replay renderer, gesture capture and the
//! command dispatcher. Nothing here performs I/O; hosts supply a [`Surface`].

pub mod color;
pub mod error;
pub mod history;
pub mod input;
pub mod render;
pub mod shortcuts;
pub mod sketchpad;
pub mod stroke;
pub mod surface;
pub mod toolbar;
pub mod tools;

pub use color::Rgba;
pub use error::{ParseError, ParseResult};
pub use history::StrokeHistory;
pub use input::{GestureState, InputCapture, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use kurbo::Point;
pub use render::RenderEngine;
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use sketchpad::{KeyOutcome, Sketchpad};
pub use stroke::{Stroke, StrokeId, StrokeShape};
pub use surface::{DrawOp, LineCap, RecordingSurface, Surface};
pub use toolbar::{Command, ToolbarEvent};
pub use tools::{StyleSnapshot, ToolKind, ToolManager};
