//! The command dispatcher tying input, history and rendering together.

use crate::history::StrokeHistory;
use crate::input::{InputCapture, KeyEvent, MouseButton, PointerEvent};
use crate::render::RenderEngine;
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::stroke::Stroke;
use crate::surface::Surface;
use crate::toolbar::{Command, ToolbarEvent};
use crate::tools::ToolManager;
use kurbo::Point;

/// Result of offering a key press to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// The key was bound to an action; the host must suppress its default handling.
    pub handled: bool,
    /// The history changed and the surface was repainted.
    pub changed: bool,
}

/// A drawing canvas: owns the history, tool configuration and gesture state,
/// and paints onto whatever [`Surface`] the host passes in.
///
/// All methods run to completion synchronously; events must be fed in arrival
/// order.
#[derive(Debug, Clone, Default)]
pub struct Sketchpad {
    history: StrokeHistory,
    tools: ToolManager,
    input: InputCapture,
    engine: RenderEngine,
}

impl Sketchpad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sketchpad with a specific tool configuration and render engine.
    pub fn with_parts(tools: ToolManager, engine: RenderEngine) -> Self {
        Self {
            tools,
            engine,
            ..Self::default()
        }
    }

    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn input(&self) -> &InputCapture {
        &self.input
    }

    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    /// Feed a pointer event. Returns true when a stroke was committed.
    pub fn handle_pointer<S: Surface + ?Sized>(&mut self, event: &PointerEvent, surface: &mut S) -> bool {
        match event {
            PointerEvent::Down { position, button } => {
                if *button == MouseButton::Left {
                    self.input
                        .press(*position, self.tools.current_tool(), self.tools.snapshot());
                }
                false
            }
            PointerEvent::Move { position } => {
                self.input.drag(*position, &self.engine, surface);
                false
            }
            PointerEvent::Up { position, button } => {
                if *button != MouseButton::Left {
                    return false;
                }
                match self.input.release(*position, &self.engine, surface) {
                    Some(stroke) => self.commit(stroke),
                    None => false,
                }
            }
            PointerEvent::Click { .. } => false,
        }
    }

    /// Handle a click. In text mode `prompt` is asked for the text to insert;
    /// any other mode ignores clicks (gestures already covered them).
    pub fn handle_click<S, F>(&mut self, position: Point, surface: &mut S, prompt: F) -> bool
    where
        S: Surface + ?Sized,
        F: FnOnce() -> Option<String>,
    {
        if !self.tools.is_text_mode() {
            return false;
        }
        match prompt() {
            Some(text) => self.insert_text(position, &text, surface),
            None => false,
        }
    }

    /// Paint `text` at `position` with the current style and commit it.
    /// Empty text is ignored.
    pub fn insert_text<S: Surface + ?Sized>(&mut self, position: Point, text: &str, surface: &mut S) -> bool {
        match Stroke::text(position, text, self.tools.snapshot()) {
            Some(stroke) => {
                self.engine.paint_stroke(&stroke, surface);
                self.commit(stroke)
            }
            None => false,
        }
    }

    /// Offer a key press to the shortcut table.
    pub fn handle_key<S: Surface + ?Sized>(&mut self, event: &KeyEvent, surface: &mut S) -> KeyOutcome {
        let Some(action) = ShortcutRegistry::resolve(event) else {
            return KeyOutcome::default();
        };
        let changed = match action {
            ShortcutAction::Undo => self.undo(surface),
            ShortcutAction::Redo => self.redo(surface),
        };
        KeyOutcome {
            handled: true,
            changed,
        }
    }

    /// Interpret a toolbar event. Malformed values are logged and ignored.
    pub fn handle_toolbar<S: Surface + ?Sized>(&mut self, event: &ToolbarEvent, surface: &mut S) -> bool {
        match Command::try_from(event) {
            Ok(command) => self.execute(command, surface),
            Err(e) => {
                log::warn!("Ignoring toolbar event: {}", e);
                false
            }
        }
    }

    /// Run a command. Returns true when the history changed.
    pub fn execute<S: Surface + ?Sized>(&mut self, command: Command, surface: &mut S) -> bool {
        match command {
            Command::Undo => self.undo(surface),
            Command::Redo => self.redo(surface),
            Command::Clear => self.clear(surface),
            Command::SelectTool(tool) => {
                self.tools.set_tool(tool);
                false
            }
            Command::SetColor(color) => {
                self.tools.set_color(color);
                false
            }
            Command::SetLineWidth(width) => {
                if !self.tools.set_line_width(width) {
                    log::warn!("Ignoring invalid line width {}", width);
                }
                false
            }
            Command::ToggleEraser => {
                let erasing = self.tools.toggle_eraser();
                log::debug!("Eraser {}", if erasing { "on" } else { "off" });
                false
            }
            Command::ToggleText => {
                let text_mode = self.tools.toggle_text();
                log::debug!("Text mode {}", if text_mode { "on" } else { "off" });
                false
            }
        }
    }

    /// Undo the last stroke and repaint. No-op on an empty history.
    pub fn undo<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.history.undo() && self.repaint(surface)
    }

    /// Redo the last undone stroke and repaint. No-op on an empty redo buffer.
    pub fn redo<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.history.redo() && self.repaint(surface)
    }

    /// Drop everything and wipe the surface.
    pub fn clear<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.input.cancel();
        let changed = self.history.clear() && self.repaint(surface);
        log::info!("Canvas cleared");
        changed
    }

    /// Repaint the surface from the full history.
    pub fn repaint<S: Surface + ?Sized>(&self, surface: &mut S) -> bool {
        self.engine.full_repaint(self.history.strokes(), surface);
        true
    }

    fn commit(&mut self, stroke: Stroke) -> bool {
        let id = stroke.id();
        let committed = self.history.append(stroke);
        if committed {
            log::debug!("Committed stroke {} ({} in history)", id, self.history.len());
        }
        committed
    }
}
