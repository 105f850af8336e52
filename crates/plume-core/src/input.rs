//! Input events, shortcut resolution and pan tracking.

use crate::command::EditorCommand;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl only.
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl and Shift.
    pub fn ctrl_shift() -> Self {
        Self {
            ctrl: true,
            shift: true,
            ..Self::NONE
        }
    }

    /// The platform command modifier: Ctrl, or Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable key, stored lowercase.
    Char(char),
    Delete,
    Backspace,
    Escape,
    Enter,
}

impl Key {
    /// Printable key, normalized to lowercase.
    pub fn char(c: char) -> Self {
        Key::Char(c.to_ascii_lowercase())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Key::Delete => f.write_str("Delete"),
            Key::Backspace => f.write_str("Backspace"),
            Key::Escape => f.write_str("Escape"),
            Key::Enter => f.write_str("Enter"),
        }
    }
}

/// Pointer event type for unified mouse handling. Positions are in screen
/// coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
        modifiers: Modifiers,
    },
}

/// Errors parsing a key chord such as `ctrl+shift+z`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Empty key chord")]
    EmptyChord,
    #[error("Unknown key: {0}")]
    UnknownKey(String),
    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),
}

/// A key together with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl Chord {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Command bound to this chord, if any.
    pub fn command(&self) -> Option<EditorCommand> {
        resolve_shortcut(self.key, self.modifiers)
    }
}

impl FromStr for Chord {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split('+')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        let (key_name, modifier_names) = parts.split_last().ok_or(InputError::EmptyChord)?;

        let mut modifiers = Modifiers::NONE;
        for name in modifier_names {
            match name.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "cmd" | "meta" | "super" => modifiers.meta = true,
                "shift" => modifiers.shift = true,
                "alt" | "option" => modifiers.alt = true,
                _ => return Err(InputError::UnknownModifier(name.to_string())),
            }
        }

        let key = match key_name.to_ascii_lowercase().as_str() {
            "delete" | "del" => Key::Delete,
            "backspace" => Key::Backspace,
            "escape" | "esc" => Key::Escape,
            "enter" | "return" => Key::Enter,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::char(c),
                    _ => return Err(InputError::UnknownKey(key_name.to_string())),
                }
            }
        };
        Ok(Chord::new(key, modifiers))
    }
}

/// Parse a comma separated list of chords, e.g. `ctrl+c, ctrl+v`.
pub fn parse_chords(script: &str) -> Result<Vec<Chord>, InputError> {
    script
        .split(',')
        .map(str::trim)
        .filter(|chord| !chord.is_empty())
        .map(str::parse::<Chord>)
        .collect()
}

/// Map a key press to the command it triggers.
pub fn resolve_shortcut(key: Key, modifiers: Modifiers) -> Option<EditorCommand> {
    if modifiers.command() {
        return match key {
            Key::Char('z') if modifiers.shift => Some(EditorCommand::Redo),
            Key::Char('z') => Some(EditorCommand::Undo),
            Key::Char('c') => Some(EditorCommand::Copy),
            Key::Char('x') => Some(EditorCommand::Cut),
            Key::Char('v') => Some(EditorCommand::Paste),
            Key::Char('g') => Some(EditorCommand::ToggleGrid),
            _ => None,
        };
    }
    match key {
        Key::Delete | Key::Backspace => Some(EditorCommand::Delete),
        Key::Escape => Some(EditorCommand::EndTextEdit),
        _ => None,
    }
}

/// Tracks an in-progress drag-to-pan gesture.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    panning: bool,
    last_pan_position: Point,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Middle button, or any button with Alt held, starts a pan.
    pub fn starts_pan(button: MouseButton, modifiers: Modifiers) -> bool {
        button == MouseButton::Middle || modifiers.alt
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn begin_pan(&mut self, position: Point) {
        self.panning = true;
        self.pointer_position = position;
        self.last_pan_position = position;
    }

    /// Move the pointer. Returns the screen delta to pan by while panning.
    pub fn pointer_moved(&mut self, position: Point) -> Option<Vec2> {
        self.pointer_position = position;
        if !self.panning {
            return None;
        }
        let delta = position - self.last_pan_position;
        self.last_pan_position = position;
        Some(delta)
    }

    pub fn end_pan(&mut self) {
        self.panning = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_shortcuts() {
        let ctrl = Modifiers::ctrl();
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(resolve_shortcut(Key::char('Z'), ctrl), Some(EditorCommand::Undo));
        assert_eq!(resolve_shortcut(Key::char('z'), cmd), Some(EditorCommand::Undo));
        assert_eq!(
            resolve_shortcut(Key::char('z'), Modifiers::ctrl_shift()),
            Some(EditorCommand::Redo)
        );
        assert_eq!(resolve_shortcut(Key::char('g'), ctrl), Some(EditorCommand::ToggleGrid));
        assert_eq!(
            resolve_shortcut(Key::Backspace, Modifiers::NONE),
            Some(EditorCommand::Delete)
        );
        assert_eq!(resolve_shortcut(Key::char('c'), Modifiers::NONE), None);
    }

    #[test]
    fn test_parse_chord() {
        let chord: Chord = "Ctrl+Shift+Z".parse().unwrap();
        assert_eq!(chord, Chord::new(Key::Char('z'), Modifiers::ctrl_shift()));
        assert_eq!("del".parse::<Chord>().unwrap().key, Key::Delete);
        assert_eq!(
            "hyper+z".parse::<Chord>(),
            Err(InputError::UnknownModifier("hyper".to_string()))
        );
        assert_eq!(
            "ctrl+zz".parse::<Chord>(),
            Err(InputError::UnknownKey("zz".to_string()))
        );
        assert_eq!("".parse::<Chord>(), Err(InputError::EmptyChord));
    }

    #[test]
    fn test_parse_chords_script() {
        let chords = parse_chords("ctrl+c, ctrl+v,").unwrap();
        let commands: Vec<_> = chords.iter().filter_map(Chord::command).collect();
        assert_eq!(commands, vec![EditorCommand::Copy, EditorCommand::Paste]);
    }

    #[test]
    fn test_pan_tracking() {
        let mut input = InputState::new();
        assert!(InputState::starts_pan(MouseButton::Middle, Modifiers::NONE));
        assert!(!InputState::starts_pan(MouseButton::Left, Modifiers::NONE));

        assert_eq!(input.pointer_moved(Point::new(5.0, 5.0)), None);
        input.begin_pan(Point::new(10.0, 10.0));
        assert_eq!(input.pointer_moved(Point::new(15.0, 30.0)), Some(Vec2::new(5.0, 20.0)));
        assert_eq!(input.pointer_moved(Point::new(16.0, 30.0)), Some(Vec2::new(1.0, 0.0)));
        input.end_pan();
        assert!(!input.is_panning());
    }
}
