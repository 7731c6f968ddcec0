//! Pointer and keyboard events as delivered by the host.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
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

    pub fn shift() -> Self {
        Self { shift: true, ..Self::NONE }
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::NONE }
    }

    /// Shift, Ctrl or Cmd held: a click adds to or removes from the selection.
    pub fn toggles_selection(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Platform command key (Ctrl, or Cmd on macOS).
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
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
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Scroll { position, .. } => *position,
        }
    }
}

/// Keyboard event type. Keys use the DOM `key` names (`"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Editor command bound to a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommand {
    Cancel,
    Delete,
    Undo,
    Redo,
    SelectAll,
    Group,
    Ungroup,
    Cut,
    Paste,
}

impl KeyCommand {
    /// Look up the command bound to `event`, if any. Releases never bind.
    pub fn from_event(event: &KeyEvent, modifiers: Modifiers) -> Option<Self> {
        let KeyEvent::Pressed(key) = event else {
            return None;
        };
        let key = key.as_str();
        if modifiers.command() {
            return match key.to_ascii_lowercase().as_str() {
                "z" if modifiers.shift => Some(KeyCommand::Redo),
                "z" => Some(KeyCommand::Undo),
                "y" => Some(KeyCommand::Redo),
                "a" => Some(KeyCommand::SelectAll),
                "g" if modifiers.shift => Some(KeyCommand::Ungroup),
                "g" => Some(KeyCommand::Group),
                "x" => Some(KeyCommand::Cut),
                "v" => Some(KeyCommand::Paste),
                _ => None,
            };
        }
        match key {
            "Escape" => Some(KeyCommand::Cancel),
            "Delete" | "Backspace" => Some(KeyCommand::Delete),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles_selection() {
        assert!(!Modifiers::default().toggles_selection());
        assert!(Modifiers::shift().toggles_selection());
        assert!(Modifiers::ctrl().toggles_selection());
        let meta = Modifiers { meta: true, ..Modifiers::NONE };
        assert!(meta.toggles_selection());
        let alt = Modifiers { alt: true, ..Modifiers::NONE };
        assert!(!alt.toggles_selection());
    }

    #[test]
    fn test_pointer_event_position() {
        let event = PointerEvent::Scroll {
            position: Point::new(3.0, 4.0),
            delta: Vec2::new(0.0, -1.0),
        };
        assert_eq!(event.position(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_pointer_event_json() {
        let event: PointerEvent =
            serde_json::from_str(r#"{"event":"down","position":{"x":1.0,"y":2.0},"button":"right"}"#).unwrap();
        assert_eq!(
            event,
            PointerEvent::Down {
                position: Point::new(1.0, 2.0),
                button: MouseButton::Right,
            }
        );
    }

    #[test]
    fn test_key_commands() {
        let press = |k: &str| KeyEvent::Pressed(k.to_string());
        assert_eq!(KeyCommand::from_event(&press("Escape"), Modifiers::NONE), Some(KeyCommand::Cancel));
        assert_eq!(KeyCommand::from_event(&press("Backspace"), Modifiers::NONE), Some(KeyCommand::Delete));
        assert_eq!(KeyCommand::from_event(&press("z"), Modifiers::ctrl()), Some(KeyCommand::Undo));
        let ctrl_shift = Modifiers { shift: true, ..Modifiers::ctrl() };
        assert_eq!(KeyCommand::from_event(&press("Z"), ctrl_shift), Some(KeyCommand::Redo));
        assert_eq!(KeyCommand::from_event(&press("g"), ctrl_shift), Some(KeyCommand::Ungroup));
        assert_eq!(KeyCommand::from_event(&press("x"), Modifiers::ctrl()), Some(KeyCommand::Cut));
        assert_eq!(KeyCommand::from_event(&press("v"), Modifiers::ctrl()), Some(KeyCommand::Paste));
        assert_eq!(KeyCommand::from_event(&press("z"), Modifiers::NONE), None);
        assert_eq!(
            KeyCommand::from_event(&KeyEvent::Released("Escape".into()), Modifiers::NONE),
            None
        );
    }
}
