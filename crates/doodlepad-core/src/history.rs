//! Stroke history with undo/redo.
//!
//! The history is an append-only log of committed strokes plus a redo buffer
//! fed by undo. Every mutating call reports whether the history changed so the
//! caller knows when a full repaint is due.

use crate::stroke::Stroke;

/// Ordered log of committed strokes and the strokes removed by undo.
#[derive(Debug, Clone, Default)]
pub struct StrokeHistory {
    /// Committed strokes, oldest first.
    strokes: Vec<Stroke>,
    /// Undone strokes, most recently undone last.
    redo_stack: Vec<Stroke>,
}

impl StrokeHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a stroke. Strokes without points are dropped.
    /// Any commit invalidates the redo buffer.
    pub fn append(&mut self, stroke: Stroke) -> bool {
        if stroke.is_empty() {
            log::debug!("Ignoring empty stroke {}", stroke.id());
            return false;
        }
        self.strokes.push(stroke);
        self.redo_stack.clear();
        true
    }

    /// Undo the last stroke.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(stroke) = self.strokes.pop() {
            self.redo_stack.push(stroke);
            true
        } else {
            false
        }
    }

    /// Redo the last undone stroke.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if let Some(stroke) = self.redo_stack.pop() {
            self.strokes.push(stroke);
            true
        } else {
            false
        }
    }

    /// Drop every stroke, including the redo buffer.
    /// Always reports a change, since the surface must be wiped regardless.
    pub fn clear(&mut self) -> bool {
        self.strokes.clear();
        self.redo_stack.clear();
        true
    }

    /// Committed strokes in paint order.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Undone strokes; the last one is restored first by redo.
    pub fn redo_strokes(&self) -> &[Stroke] {
        &self.redo_stack
    }

    pub fn can_undo(&self) -> bool {
        !self.strokes.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
