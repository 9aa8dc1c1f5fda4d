//! Low-level keyboard events as delivered to a target.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModifierState;

/// Kind of a dispatched keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEventKind {
    /// Key went down (also fired for every auto-repeat).
    KeyDown,
    /// Key produced input.
    KeyPress,
    /// Key was released.
    KeyUp,
}

impl KeyEventKind {
    /// DOM event name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KeyDown => "keydown",
            Self::KeyPress => "keypress",
            Self::KeyUp => "keyup",
        }
    }
}

impl fmt::Display for KeyEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A keyboard event ready for dispatch.
///
/// Carries the modifier snapshot taken when the event was built, so a
/// key-press of `"a"` while ctrl is held has `ctrl_key` set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardEvent {
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: KeyEventKind,
    /// Key name as written in the sequence.
    pub key: String,
    /// Numeric key code from the key code table.
    pub key_code: u32,
    /// Modifiers held when the event was built.
    #[serde(flatten)]
    pub modifiers: ModifierState,
    /// True for events produced by auto-repeat.
    pub repeat: bool,
}

impl fmt::Display for KeyboardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}", self.kind, self.key)?;
        let flags = [
            (self.modifiers.ctrl_key, "ctrl"),
            (self.modifiers.shift_key, "shift"),
            (self.modifiers.alt_key, "alt"),
            (self.modifiers.meta_key, "meta"),
            (self.repeat, "repeat"),
        ];
        for (_, name) in flags.iter().filter(|(set, _)| *set) {
            write!(f, " +{name}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: KeyEventKind, key: &str) -> KeyboardEvent {
        KeyboardEvent {
            kind,
            key: key.to_string(),
            key_code: 65,
            modifiers: ModifierState::default(),
            repeat: false,
        }
    }

    #[test]
    fn kind_names_match_dom() {
        assert_eq!(KeyEventKind::KeyDown.to_string(), "keydown");
        assert_eq!(KeyEventKind::KeyPress.to_string(), "keypress");
        assert_eq!(KeyEventKind::KeyUp.to_string(), "keyup");
    }

    #[test]
    fn display_lists_held_flags() {
        let mut ev = event(KeyEventKind::KeyPress, "a");
        assert_eq!(ev.to_string(), "keypress(a)");

        ev.modifiers.ctrl_key = true;
        ev.repeat = true;
        assert_eq!(ev.to_string(), "keypress(a +ctrl +repeat)");
    }

    #[test]
    fn serializes_like_a_dom_event() {
        let mut ev = event(KeyEventKind::KeyDown, "a");
        ev.modifiers.shift_key = true;

        let json = serde_json::to_value(&ev).unwrap();

        assert_eq!(json["type"], "keydown");
        assert_eq!(json["keyCode"], 65);
        assert_eq!(json["shiftKey"], true);
        assert_eq!(json["ctrlKey"], false);
        assert_eq!(json["repeat"], false);
    }
}
