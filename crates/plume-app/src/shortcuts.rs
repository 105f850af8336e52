//! Keyboard shortcut registry and documentation.

use plume_core::{Chord, InputError};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
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

    /// The chord this shortcut is pressed with.
    pub fn chord(&self) -> Result<Chord, InputError> {
        self.format().parse()
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts. Cmd works in place of Ctrl on macOS.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("C", true, false, "Copy selection"),
            Shortcut::new("X", true, false, "Cut selection"),
            Shortcut::new("V", true, false, "Paste"),
            Shortcut::new("G", true, false, "Toggle grid"),
            Shortcut::new("Delete", false, false, "Delete selection"),
            Shortcut::new("Backspace", false, false, "Delete selection"),
            Shortcut::new("Escape", false, false, "Finish editing text"),
        ]
    }

    /// Pointer gestures, as (gesture, description) pairs.
    pub fn gestures() -> &'static [(&'static str, &'static str)] {
        &[
            ("Right click", "Add text, group, ungroup or delete"),
            ("Shift+Click", "Extend selection"),
            ("Middle drag / Alt+Drag", "Pan"),
            ("Ctrl+Wheel", "Zoom at pointer"),
        ]
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!("\n=== Pointer ===");
        for (gesture, description) in Self::gestures() {
            println!("  {:20} {}", gesture, description);
        }
        println!();
    }
}
