//! Standard stream invariants.

use std::collections::HashMap;

use keyseq_core::{KeyEventKind, KeyboardEvent, ModifierState};

use super::{Invariant, InvariantKind, InvariantResult, Violation};

/// Modifier flags on every event equal the net modifier history.
///
/// Replaying keydown/keyup of `ctrl`, `shift`, `alt` and `meta` up to and
/// including an event must give exactly the flags that event carries.
pub struct ModifierConsistency;

impl Invariant for ModifierConsistency {
    fn kind(&self) -> InvariantKind {
        InvariantKind::ModifierConsistency
    }

    fn check(&self, events: &[KeyboardEvent]) -> InvariantResult {
        let mut expected = ModifierState::default();
        for (index, event) in events.iter().enumerate() {
            match event.kind {
                KeyEventKind::KeyDown => expected.set_modifier(&event.key, true),
                KeyEventKind::KeyUp => expected.set_modifier(&event.key, false),
                KeyEventKind::KeyPress => {},
            }
            if event.modifiers != expected {
                return Err(Violation {
                    invariant: self.kind(),
                    index,
                    message: format!("{event} carries {:?}, expected {expected:?}", event.modifiers),
                });
            }
        }
        Ok(())
    }
}

/// A keyup only releases a key that is currently down.
///
/// Repeat keydowns do not count: the press that owns them emits the keyup.
pub struct KeyUpMatchesKeyDown;

impl Invariant for KeyUpMatchesKeyDown {
    fn kind(&self) -> InvariantKind {
        InvariantKind::KeyUpMatchesKeyDown
    }

    fn check(&self, events: &[KeyboardEvent]) -> InvariantResult {
        let mut held: HashMap<&str, usize> = HashMap::new();
        for (index, event) in events.iter().enumerate() {
            match event.kind {
                KeyEventKind::KeyDown if !event.repeat => {
                    *held.entry(event.key.as_str()).or_default() += 1;
                },
                KeyEventKind::KeyUp => match held.get_mut(event.key.as_str()) {
                    Some(count) if *count > 0 => *count -= 1,
                    _ => {
                        return Err(Violation {
                            invariant: self.kind(),
                            index,
                            message: format!("{event} without a matching keydown"),
                        });
                    },
                },
                _ => {},
            }
        }
        Ok(())
    }
}

/// Every keypress directly follows a keydown of the same key.
pub struct KeyPressFollowsKeyDown;

impl Invariant for KeyPressFollowsKeyDown {
    fn kind(&self) -> InvariantKind {
        InvariantKind::KeyPressFollowsKeyDown
    }

    fn check(&self, events: &[KeyboardEvent]) -> InvariantResult {
        for (index, event) in events.iter().enumerate() {
            if event.kind != KeyEventKind::KeyPress {
                continue;
            }
            let paired = index
                .checked_sub(1)
                .and_then(|prev| events.get(prev))
                .is_some_and(|prev| {
                    prev.kind == KeyEventKind::KeyDown
                        && prev.key == event.key
                        && prev.repeat == event.repeat
                });
            if !paired {
                return Err(Violation {
                    invariant: self.kind(),
                    index,
                    message: format!("{event} not preceded by its keydown"),
                });
            }
        }
        Ok(())
    }
}

/// Auto-repeat never releases a key.
pub struct RepeatNeverKeyUp;

impl Invariant for RepeatNeverKeyUp {
    fn kind(&self) -> InvariantKind {
        InvariantKind::RepeatNeverKeyUp
    }

    fn check(&self, events: &[KeyboardEvent]) -> InvariantResult {
        match events.iter().position(|e| e.repeat && e.kind == KeyEventKind::KeyUp) {
            Some(index) => Err(Violation {
                invariant: self.kind(),
                index,
                message: format!("{} is a repeat keyup", events[index]),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(kind: KeyEventKind, key: &str) -> KeyboardEvent {
        KeyboardEvent {
            kind,
            key: key.to_string(),
            key_code: 0,
            modifiers: ModifierState::default(),
            repeat: false,
        }
    }

    fn ctrl_held(mut event: KeyboardEvent) -> KeyboardEvent {
        event.modifiers.ctrl_key = true;
        event
    }

    #[test]
    fn modifier_consistency_accepts_held_ctrl() {
        let events = vec![
            ctrl_held(ev(KeyEventKind::KeyDown, "ctrl")),
            ctrl_held(ev(KeyEventKind::KeyPress, "a")),
            ev(KeyEventKind::KeyUp, "ctrl"),
        ];

        assert!(ModifierConsistency.check(&events).is_ok());
    }

    #[test]
    fn modifier_consistency_catches_stale_flag() {
        let events =
            vec![ctrl_held(ev(KeyEventKind::KeyDown, "ctrl")), ctrl_held(ev(KeyEventKind::KeyUp, "ctrl"))];

        let violation = ModifierConsistency.check(&events).unwrap_err();
        assert_eq!(violation.invariant, InvariantKind::ModifierConsistency);
        assert_eq!(violation.index, 1);
    }

    #[test]
    fn keyup_without_keydown_is_violation() {
        let events = vec![ev(KeyEventKind::KeyUp, "a")];

        assert!(KeyUpMatchesKeyDown.check(&events).is_err());
    }

    #[test]
    fn repeat_keydown_does_not_arm_keyup() {
        let mut repeat = ev(KeyEventKind::KeyDown, "a");
        repeat.repeat = true;
        let events = vec![repeat, ev(KeyEventKind::KeyUp, "a")];

        assert!(KeyUpMatchesKeyDown.check(&events).is_err());
    }

    #[test]
    fn nested_same_key_presses_balance() {
        let events = vec![
            ev(KeyEventKind::KeyDown, "a"),
            ev(KeyEventKind::KeyDown, "a"),
            ev(KeyEventKind::KeyUp, "a"),
            ev(KeyEventKind::KeyUp, "a"),
        ];

        assert!(KeyUpMatchesKeyDown.check(&events).is_ok());
    }

    #[test]
    fn keypress_must_follow_its_keydown() {
        let good = vec![ev(KeyEventKind::KeyDown, "a"), ev(KeyEventKind::KeyPress, "a")];
        let wrong_key = vec![ev(KeyEventKind::KeyDown, "a"), ev(KeyEventKind::KeyPress, "b")];
        let leading = vec![ev(KeyEventKind::KeyPress, "a")];

        assert!(KeyPressFollowsKeyDown.check(&good).is_ok());
        assert!(KeyPressFollowsKeyDown.check(&wrong_key).is_err());
        assert!(KeyPressFollowsKeyDown.check(&leading).is_err());
    }

    #[test]
    fn repeat_keyup_is_violation() {
        let mut up = ev(KeyEventKind::KeyUp, "a");
        up.repeat = true;

        let violation = RepeatNeverKeyUp.check(&[up]).unwrap_err();
        assert_eq!(violation.index, 0);
    }
}
