//! Modifier key bookkeeping.

use serde::{Deserialize, Serialize};

/// Modifier keys currently held during one sequence run.
///
/// A key named `"ctrl"`, `"shift"`, `"alt"` or `"meta"` toggles the matching
/// `<name>Key` flag on key-down and key-up. Any other key name leaves the
/// state untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierState {
    /// Ctrl is held.
    pub ctrl_key: bool,
    /// Shift is held.
    pub shift_key: bool,
    /// Alt is held.
    pub alt_key: bool,
    /// Meta is held.
    pub meta_key: bool,
}

impl ModifierState {
    /// All modifiers released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` going down or up.
    ///
    /// No-op for keys that are not modifiers. Unlike key code lookup this
    /// never fails.
    pub fn set_modifier(&mut self, key: &str, is_down: bool) {
        if let Some(flag) = self.flag_mut(key) {
            *flag = is_down;
        }
    }

    /// Copy of the current flags, as stamped on a dispatched event.
    pub fn snapshot(self) -> Self {
        self
    }

    /// Whether any modifier is held.
    pub fn any(&self) -> bool {
        self.ctrl_key || self.shift_key || self.alt_key || self.meta_key
    }

    fn flag_mut(&mut self, key: &str) -> Option<&mut bool> {
        match key {
            "ctrl" => Some(&mut self.ctrl_key),
            "shift" => Some(&mut self.shift_key),
            "alt" => Some(&mut self.alt_key),
            "meta" => Some(&mut self.meta_key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_released() {
        let state = ModifierState::new();

        assert!(!state.any());
    }

    #[test]
    fn down_then_up_toggles_flag() {
        let mut state = ModifierState::new();

        state.set_modifier("ctrl", true);
        assert!(state.ctrl_key);
        assert!(!state.shift_key);

        state.set_modifier("ctrl", false);
        assert!(!state.ctrl_key);
    }

    #[test]
    fn snapshot_is_detached_from_later_changes() {
        let mut state = ModifierState::new();
        state.set_modifier("alt", true);

        let snapshot = state.snapshot();
        state.set_modifier("alt", false);

        assert!(snapshot.alt_key);
        assert!(!state.alt_key);
    }

    #[test]
    fn each_modifier_has_its_own_flag() {
        let mut state = ModifierState::new();

        state.set_modifier("shift", true);
        state.set_modifier("alt", true);
        state.set_modifier("meta", true);

        assert_eq!(
            state,
            ModifierState { ctrl_key: false, shift_key: true, alt_key: true, meta_key: true }
        );
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut state = ModifierState::new();

        state.set_modifier("a", true);
        state.set_modifier("Ctrl", true);
        state.set_modifier("ctrlKey", true);

        assert!(!state.any());
    }

    #[test]
    fn serializes_with_dom_field_names() {
        let state = ModifierState { ctrl_key: true, ..ModifierState::default() };
        let json = serde_json::to_value(state).unwrap();

        assert_eq!(json["ctrlKey"], true);
        assert_eq!(json["metaKey"], false);
    }
}
