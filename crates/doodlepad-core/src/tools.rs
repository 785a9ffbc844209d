//! Tool selection and the drawing configuration frozen into new strokes.

use crate::color::Rgba;
use serde::{Deserialize, Serialize};

/// Line width used when no width has been picked yet.
pub const DEFAULT_LINE_WIDTH: f64 = 5.0;
/// The pencil always paints with this width, whatever the width picker says.
pub const PENCIL_WIDTH: f64 = 2.0;
/// Text is sized relative to the line width.
pub const TEXT_SIZE_FACTOR: f64 = 5.0;
/// Font family used for text insertions.
pub const TEXT_FONT_FAMILY: &str = "Arial";

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Brush,
    Pencil,
    Circle,
    Eraser,
    Text,
}

impl ToolKind {
    /// Look up a tool by its toolbar control id.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "brush" => Some(ToolKind::Brush),
            "pencil" => Some(ToolKind::Pencil),
            "circle" => Some(ToolKind::Circle),
            "eraser" => Some(ToolKind::Eraser),
            "textTool" => Some(ToolKind::Text),
            _ => None,
        }
    }

    /// Toolbar control id for this tool.
    pub fn id(self) -> &'static str {
        match self {
            ToolKind::Brush => "brush",
            ToolKind::Pencil => "pencil",
            ToolKind::Circle => "circle",
            ToolKind::Eraser => "eraser",
            ToolKind::Text => "textTool",
        }
    }

    /// Tools whose gestures record a point per pointer move.
    pub fn is_freehand(self) -> bool {
        matches!(self, ToolKind::Brush | ToolKind::Pencil | ToolKind::Eraser)
    }

    /// Tools that take part in the press/move/release gesture machine.
    pub fn uses_gestures(self) -> bool {
        self != ToolKind::Text
    }
}

/// Immutable style captured when a gesture starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleSnapshot {
    pub color: Rgba,
    pub width: f64,
}

impl StyleSnapshot {
    pub fn new(color: Rgba, width: f64) -> Self {
        Self { color, width }
    }

    /// Font size used by text insertions painted with this style.
    pub fn font_size(&self) -> f64 {
        self.width * TEXT_SIZE_FACTOR
    }
}

/// Manages the current tool and the style applied to new strokes.
///
/// This is the single owner of the drawing configuration. It is mutated only
/// through the dispatcher and read once per gesture via [`ToolManager::snapshot`].
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    current_tool: ToolKind,
    /// Tool to return to when the eraser or text mode is toggled off.
    previous_tool: ToolKind,
    /// Color chosen in the color picker.
    picked_color: Rgba,
    /// Width chosen in the width picker.
    line_width: f64,
    /// Canvas background, painted by the eraser.
    background: Rgba,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            previous_tool: ToolKind::default(),
            picked_color: Rgba::BLACK,
            line_width: DEFAULT_LINE_WIDTH,
            background: Rgba::WHITE,
        }
    }
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tool manager whose eraser paints `background`.
    pub fn with_background(background: Rgba) -> Self {
        Self {
            background,
            ..Self::default()
        }
    }

    pub fn current_tool(&self) -> ToolKind {
        self.current_tool
    }

    pub fn picked_color(&self) -> Rgba {
        self.picked_color
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn is_erasing(&self) -> bool {
        self.current_tool == ToolKind::Eraser
    }

    pub fn is_text_mode(&self) -> bool {
        self.current_tool == ToolKind::Text
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.current_tool != ToolKind::Eraser && self.current_tool != ToolKind::Text {
            self.previous_tool = self.current_tool;
        }
        self.current_tool = tool;
    }

    /// Flip between the eraser and the last drawing tool.
    /// Returns whether the eraser is now active.
    pub fn toggle_eraser(&mut self) -> bool {
        self.toggle(ToolKind::Eraser)
    }

    /// Flip text mode on or off. Returns whether text mode is now active.
    pub fn toggle_text(&mut self) -> bool {
        self.toggle(ToolKind::Text)
    }

    fn toggle(&mut self, tool: ToolKind) -> bool {
        if self.current_tool == tool {
            self.current_tool = self.previous_tool;
            false
        } else {
            self.set_tool(tool);
            true
        }
    }

    /// Label for the eraser toggle button.
    pub fn eraser_label(&self) -> &'static str {
        if self.is_erasing() { "Draw" } else { "Eraser" }
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.picked_color = color;
    }

    /// Set the picker width. Non-finite or non-positive widths are rejected.
    pub fn set_line_width(&mut self, width: f64) -> bool {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
            true
        } else {
            false
        }
    }

    /// Freeze the style a gesture started now would paint with.
    pub fn snapshot(&self) -> StyleSnapshot {
        match self.current_tool {
            ToolKind::Eraser => StyleSnapshot::new(self.background, self.line_width),
            ToolKind::Pencil => StyleSnapshot::new(self.picked_color, PENCIL_WIDTH),
            ToolKind::Brush | ToolKind::Circle | ToolKind::Text => {
                StyleSnapshot::new(self.picked_color, self.line_width)
            }
        }
    }
}
