//! Reference model for model-based testing.
//!
//! [`expected_dispatches`] computes, synchronously and with an explicit work
//! stack instead of recursion, the event stream a sequence must produce.
//! Tests run the real [`keyseq_core::Interpreter`] on the same sequence and
//! compare the two.
//!
//! [`ModelEvent`] is an `Arbitrary` sequence generator over a small key set
//! (including one key the standard table lacks) for fuzzing.

use std::time::Duration;

use arbitrary::Arbitrary;
use keyseq_core::{
    Event, KeyCodeTable, KeyEventKind, KeyboardEvent, ModifierState, RepeatPolicy, SequenceError,
};

/// Why the model expects a run to fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelFailure {
    /// Unknown `type` reached.
    InvalidEventType(String),
    /// Unknown key dispatched.
    InvalidKey(String),
    /// Top-level repeat under [`RepeatPolicy::Reject`].
    MisplacedRepeat(String),
}

impl ModelFailure {
    /// Whether `error` is the failure the model predicted.
    pub fn matches(&self, error: &SequenceError) -> bool {
        match (self, error) {
            (Self::InvalidEventType(want), SequenceError::InvalidEventType { type_name }) => {
                want == type_name
            },
            (Self::InvalidKey(want), SequenceError::InvalidKey { key })
            | (Self::MisplacedRepeat(want), SequenceError::MisplacedRepeat { key }) => want == key,
            _ => false,
        }
    }
}

/// Expected result of running a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelOutcome {
    /// Events dispatched before completion or failure.
    pub events: Vec<KeyboardEvent>,
    /// Virtual time at which each event is dispatched.
    pub times: Vec<Duration>,
    /// Failure ending the run, if any.
    pub failure: Option<ModelFailure>,
}

enum Step<'a> {
    Run { event: &'a Event, depth: usize },
    Fire { kind: KeyEventKind, key: &'a str, repeat: bool },
}

/// Compute the expected outcome of running `sequence`.
pub fn expected_dispatches(
    sequence: &[Event],
    table: &KeyCodeTable,
    policy: RepeatPolicy,
) -> ModelOutcome {
    let mut outcome = ModelOutcome::default();
    let mut modifiers = ModifierState::default();
    let mut now = Duration::ZERO;
    let mut stack: Vec<Step<'_>> =
        sequence.iter().rev().map(|event| Step::Run { event, depth: 0 }).collect();

    while let Some(step) = stack.pop() {
        match step {
            Step::Fire { kind, key, repeat } => {
                let Some(key_code) = table.code(key) else {
                    outcome.failure = Some(ModelFailure::InvalidKey(key.to_string()));
                    return outcome;
                };
                match kind {
                    KeyEventKind::KeyDown => modifiers.set_modifier(key, true),
                    KeyEventKind::KeyUp => modifiers.set_modifier(key, false),
                    KeyEventKind::KeyPress => {},
                }
                outcome.events.push(KeyboardEvent {
                    kind,
                    key: key.to_string(),
                    key_code,
                    modifiers,
                    repeat,
                });
                outcome.times.push(now);
            },
            Step::Run { event: Event::Press { key, events }, depth } => {
                let key = key.as_str();
                stack.push(Step::Fire { kind: KeyEventKind::KeyUp, key, repeat: false });
                stack.extend(events.iter().rev().map(|event| Step::Run { event, depth: depth + 1 }));
                stack.push(Step::Fire { kind: KeyEventKind::KeyPress, key, repeat: false });
                stack.push(Step::Fire { kind: KeyEventKind::KeyDown, key, repeat: false });
            },
            Step::Run { event: Event::Wait { duration }, .. } => {
                now += *duration;
            },
            Step::Run { event: Event::Repeat { key, count }, depth } => {
                if depth == 0 && policy == RepeatPolicy::Reject {
                    outcome.failure = Some(ModelFailure::MisplacedRepeat(key.clone()));
                    return outcome;
                }
                let key = key.as_str();
                for _ in 0..*count {
                    stack.push(Step::Fire { kind: KeyEventKind::KeyPress, key, repeat: true });
                    stack.push(Step::Fire { kind: KeyEventKind::KeyDown, key, repeat: true });
                }
            },
            Step::Run { event: Event::Invalid { type_name }, .. } => {
                outcome.failure = Some(ModelFailure::InvalidEventType(type_name.clone()));
                return outcome;
            },
        }
    }

    outcome
}

/// Small key alphabet for generated sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum ModelKey {
    /// `"a"`
    A,
    /// `"b"`
    B,
    /// `"enter"`
    Enter,
    /// `"ctrl"`
    Ctrl,
    /// `"shift"`
    Shift,
    /// `"meta"`
    Meta,
    /// `"hyper"`, absent from the standard table.
    Unknown,
}

impl ModelKey {
    /// Key name.
    pub fn name(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::Enter => "enter",
            Self::Ctrl => "ctrl",
            Self::Shift => "shift",
            Self::Meta => "meta",
            Self::Unknown => "hyper",
        }
    }
}

/// Generated event, converted with [`ModelEvent::into_event`].
#[derive(Debug, Clone, Arbitrary)]
pub enum ModelEvent {
    /// Press with nested events.
    Press {
        /// Key pressed.
        key: ModelKey,
        /// Nested events.
        events: Vec<ModelEvent>,
    },
    /// Pause.
    Wait {
        /// Milliseconds (kept small).
        ms: u8,
    },
    /// Auto-repeat.
    Repeat {
        /// Key repeated.
        key: ModelKey,
        /// Repeat count (kept small).
        count: u8,
    },
    /// Event with an unrecognized type.
    Invalid,
}

impl ModelEvent {
    /// Convert into a core event.
    pub fn into_event(self) -> Event {
        match self {
            Self::Press { key, events } => Event::press_with(
                key.name(),
                events.into_iter().map(Self::into_event).collect::<Vec<_>>(),
            ),
            Self::Wait { ms } => Event::wait(u64::from(ms)),
            Self::Repeat { key, count } => Event::repeat(key.name(), u32::from(count % 8)),
            Self::Invalid => Event::Invalid { type_name: "tap".to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(sequence: &[Event]) -> ModelOutcome {
        expected_dispatches(sequence, &KeyCodeTable::standard(), RepeatPolicy::Allow)
    }

    #[test]
    fn press_expands_to_three_events() {
        let outcome = model(&[Event::press("a")]);

        let kinds: Vec<_> = outcome.events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![KeyEventKind::KeyDown, KeyEventKind::KeyPress, KeyEventKind::KeyUp]);
        assert!(outcome.failure.is_none());
    }

    #[test]
    fn wait_shifts_later_timestamps() {
        let outcome = model(&[Event::press("a"), Event::wait(20), Event::press("b")]);

        assert_eq!(outcome.times[2], Duration::ZERO);
        assert_eq!(outcome.times[3], Duration::from_millis(20));
    }

    #[test]
    fn nested_repeat_has_no_keyup() {
        let outcome = model(&[Event::press_with("a", [Event::repeat("a", 3)])]);

        let repeats: Vec<_> = outcome.events.iter().filter(|e| e.repeat).collect();
        assert_eq!(repeats.len(), 6);
        assert!(repeats.iter().all(|e| e.kind != KeyEventKind::KeyUp));
    }

    #[test]
    fn failure_keeps_prefix() {
        let outcome = model(&[Event::press("a"), Event::press("hyper")]);

        assert_eq!(outcome.events.len(), 3);
        assert_eq!(outcome.failure, Some(ModelFailure::InvalidKey("hyper".into())));
    }

    #[test]
    fn reject_policy_flags_top_level_repeat() {
        let outcome =
            expected_dispatches(&[Event::repeat("a", 1)], &KeyCodeTable::standard(), RepeatPolicy::Reject);

        assert!(outcome.events.is_empty());
        assert_eq!(outcome.failure, Some(ModelFailure::MisplacedRepeat("a".into())));
    }

    #[test]
    fn failure_matching() {
        let failure = ModelFailure::InvalidKey("x".into());

        assert!(failure.matches(&SequenceError::InvalidKey { key: "x".into() }));
        assert!(!failure.matches(&SequenceError::InvalidKey { key: "y".into() }));
        assert!(!failure.matches(&SequenceError::InvalidEventType { type_name: "x".into() }));
    }
}
