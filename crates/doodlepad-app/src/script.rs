//! Recorded event scripts for headless drawing.
//!
//! A script is a JSON array of events, e.g.
//!
//! ```json
//! [
//!   { "toolbar": { "type": "change", "id": "stroke", "value": "#ff0000" } },
//!   { "pointer": { "type": "down", "position": { "x": 10, "y": 10 } } },
//!   { "pointer": { "type": "move", "position": { "x": 50, "y": 10 } } },
//!   { "pointer": { "type": "up", "position": { "x": 50, "y": 10 } } },
//!   { "key": { "key": "z", "modifiers": { "ctrl": true } } },
//!   { "text": { "position": { "x": 5, "y": 40 }, "text": "hello" } }
//! ]
//! ```

use crate::error::AppResult;
use doodlepad_core::{KeyEvent, Point, PointerEvent, Sketchpad, Surface, ToolbarEvent};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recorded input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptEvent {
    Pointer(PointerEvent),
    Key(KeyEvent),
    Toolbar(ToolbarEvent),
    /// A click in text mode answered with `text`.
    Text { position: Point, text: String },
}

/// Counters from a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    /// Events that changed the history.
    pub changes: usize,
    /// Key presses bound to a shortcut.
    pub shortcuts: usize,
}

pub fn parse_script(json: &str) -> AppResult<Vec<ScriptEvent>> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_script(path: &Path) -> AppResult<Vec<ScriptEvent>> {
    let json = std::fs::read_to_string(path)?;
    let events = parse_script(&json)?;
    log::info!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Feed `events` to the sketchpad in order.
pub fn replay<S: Surface + ?Sized>(events: &[ScriptEvent], pad: &mut Sketchpad, surface: &mut S) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for event in events {
        summary.events += 1;
        let changed = match event {
            ScriptEvent::Pointer(pointer) => pad.handle_pointer(pointer, surface),
            ScriptEvent::Key(key) => {
                let outcome = pad.handle_key(key, surface);
                if outcome.handled {
                    summary.shortcuts += 1;
                }
                outcome.changed
            }
            ScriptEvent::Toolbar(toolbar) => pad.handle_toolbar(toolbar, surface),
            ScriptEvent::Text { position, text } => {
                pad.handle_click(*position, surface, || Some(text.clone()))
            }
        };
        if changed {
            summary.changes += 1;
        }
    }
    log::debug!("Replayed {:?}", summary);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use doodlepad_core::{RecordingSurface, StrokeShape};
    use pretty_assertions::assert_eq;

    const SCRIPT: &str = r##"[
        { "toolbar": { "type": "change", "id": "stroke", "value": "#ff0000" } },
        { "pointer": { "type": "down", "position": { "x": 10, "y": 10 } } },
        { "pointer": { "type": "move", "position": { "x": 50, "y": 10 } } },
        { "pointer": { "type": "up", "position": { "x": 50, "y": 10 } } },
        { "toolbar": { "type": "click", "id": "textTool" } },
        { "text": { "position": { "x": 5, "y": 40 }, "text": "hello" } },
        { "key": { "key": "z", "modifiers": { "ctrl": true } } }
    ]"##;

    #[test]
    fn test_parse_and_replay() {
        let events = parse_script(SCRIPT).unwrap();
        assert_eq!(events.len(), 7);

        let mut pad = Sketchpad::new();
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let summary = replay(&events, &mut pad, &mut surface);

        assert_eq!(
            summary,
            ReplaySummary {
                events: 7,
                changes: 3,
                shortcuts: 1
            }
        );
        assert_eq!(pad.history().len(), 1);
        assert_eq!(pad.history().strokes()[0].shape(), &StrokeShape::Freehand);
        assert_eq!(pad.history().redo_strokes().len(), 1);
    }

    #[test]
    fn test_rejects_malformed_script() {
        assert!(parse_script(r#"[{ "pointer": { "type": "hover" } }]"#).is_err());
        assert!(parse_script("{}").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_script(Path::new("/nonexistent/doodlepad-script.json")).unwrap_err();
        assert!(matches!(err, crate::error::AppError::Io(_)));
    }
}
