//! Keyboard shortcut registry and lookup.

use crate::input::KeyEvent;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    Undo,
    Redo,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Whether `event` triggers this shortcut. Keys compare case-insensitively,
    /// since Shift turns `z` into `Z`.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.key.eq_ignore_ascii_case(self.key)
            && event.modifiers.ctrl == self.ctrl
            && event.modifiers.shift == self.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, ShortcutAction::Undo, "Undo"),
            Shortcut::new("Y", true, false, ShortcutAction::Redo, "Redo"),
            Shortcut::new("Z", true, true, ShortcutAction::Redo, "Redo"),
        ]
    }

    /// Find the action bound to a key press, if any.
    pub fn resolve(event: &KeyEvent) -> Option<ShortcutAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(event))
            .map(|shortcut| shortcut.action)
    }

    /// Log all shortcuts.
    pub fn log_all() {
        for shortcut in Self::all() {
            log::info!("  {:12} {}", shortcut.format(), shortcut.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    #[test]
    fn test_undo_binding() {
        assert_eq!(
            ShortcutRegistry::resolve(&KeyEvent::new("z", Modifiers::CTRL)),
            Some(ShortcutAction::Undo)
        );
    }

    #[test]
    fn test_redo_bindings() {
        assert_eq!(
            ShortcutRegistry::resolve(&KeyEvent::new("y", Modifiers::CTRL)),
            Some(ShortcutAction::Redo)
        );
        assert_eq!(
            ShortcutRegistry::resolve(&KeyEvent::new("Z", Modifiers::CTRL_SHIFT)),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(ShortcutRegistry::resolve(&KeyEvent::new("z", Modifiers::default())), None);
        assert_eq!(ShortcutRegistry::resolve(&KeyEvent::new("x", Modifiers::CTRL)), None);
    }

    #[test]
    fn test_format() {
        let formatted: Vec<String> = ShortcutRegistry::all().iter().map(Shortcut::format).collect();
        assert_eq!(formatted, vec!["Ctrl+Z", "Ctrl+Y", "Ctrl+Shift+Z"]);
    }
}
