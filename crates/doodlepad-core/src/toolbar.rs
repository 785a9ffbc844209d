//! Toolbar control events and the commands they map to.

use crate::color::Rgba;
use crate::error::{ParseError, ParseResult};
use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};

/// A raw event from a toolbar control, identified by the control's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolbarEvent {
    /// An input control changed value (`stroke` color, `lineWidth`).
    Change { id: String, value: String },
    /// A button was clicked.
    Click { id: String },
}

impl ToolbarEvent {
    pub fn change(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Change {
            id: id.into(),
            value: value.into(),
        }
    }

    pub fn click(id: impl Into<String>) -> Self {
        Self::Click { id: id.into() }
    }
}

/// A discrete editing action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Undo,
    Redo,
    Clear,
    SelectTool(ToolKind),
    SetColor(Rgba),
    SetLineWidth(f64),
    ToggleEraser,
    ToggleText,
}

impl TryFrom<&ToolbarEvent> for Command {
    type Error = ParseError;

    fn try_from(event: &ToolbarEvent) -> ParseResult<Self> {
        match event {
            ToolbarEvent::Change { id, value } => match id.as_str() {
                "stroke" => Ok(Command::SetColor(Rgba::from_hex(value)?)),
                "lineWidth" => parse_width(value).map(Command::SetLineWidth),
                other => Err(ParseError::UnknownControl(other.to_string())),
            },
            ToolbarEvent::Click { id } => match id.as_str() {
                "clear" => Ok(Command::Clear),
                "undo" => Ok(Command::Undo),
                "redo" => Ok(Command::Redo),
                "eraser" => Ok(Command::ToggleEraser),
                "textTool" => Ok(Command::ToggleText),
                other => ToolKind::from_id(other)
                    .map(Command::SelectTool)
                    .ok_or_else(|| ParseError::UnknownControl(other.to_string())),
            },
        }
    }
}

fn parse_width(value: &str) -> ParseResult<f64> {
    let width: f64 = value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidWidth(value.to_string()))?;
    if width.is_finite() && width > 0.0 {
        Ok(width)
    } else {
        Err(ParseError::InvalidWidth(value.to_string()))
    }
}
