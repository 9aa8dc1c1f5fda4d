//! Abstract key events and sequences.
//!
//! A [`Sequence`] is what callers write; the [`crate::Interpreter`] turns it
//! into low-level [`crate::KeyboardEvent`]s.
//!
//! # JSON form
//!
//! ```json
//! [
//!   "a",
//!   { "type": "wait", "ms": 50 },
//!   { "type": "press", "key": "ctrl", "events": [
//!     { "type": "press", "key": "c" },
//!     { "type": "repeat", "key": "ctrl", "count": 2 }
//!   ] }
//! ]
//! ```
//!
//! A bare string is shorthand for a press without nested events. An event
//! whose `type` is missing or unrecognized decodes to [`Event::Invalid`] and
//! only fails once the interpreter reaches it; its other fields are not
//! checked.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ParseError;

/// Ordered list of events. Order is execution order.
pub type Sequence = Vec<Event>;

/// One abstract key event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum Event {
    /// Press and release a key.
    Press {
        /// Key name.
        key: String,
        /// Events run while the key is held, after key-down/key-press and
        /// before key-up.
        events: Sequence,
    },

    /// Pause without dispatching anything.
    Wait {
        /// Pause length, written as (possibly fractional) `ms` in JSON.
        duration: Duration,
    },

    /// Auto-repeat of a held key. Belongs inside [`Event::Press`] `events`.
    Repeat {
        /// Key name.
        key: String,
        /// Number of extra key-down/key-press pairs.
        count: u32,
    },

    /// Object-shaped event whose `type` was not recognized.
    Invalid {
        /// The unrecognized `type` value.
        type_name: String,
    },
}

impl Event {
    /// Press of `key` with no nested events.
    pub fn press(key: impl Into<String>) -> Self {
        Self::Press { key: key.into(), events: Vec::new() }
    }

    /// Press of `key` holding it down while `events` run.
    pub fn press_with(key: impl Into<String>, events: impl Into<Sequence>) -> Self {
        Self::Press { key: key.into(), events: events.into() }
    }

    /// Pause for `ms` milliseconds.
    pub fn wait(ms: u64) -> Self {
        Self::Wait { duration: Duration::from_millis(ms) }
    }

    /// `count` auto-repeats of `key`.
    pub fn repeat(key: impl Into<String>, count: u32) -> Self {
        Self::Repeat { key: key.into(), count }
    }

    /// The `type` discriminator this event is written with.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Press { .. } => "press",
            Self::Wait { .. } => "wait",
            Self::Repeat { .. } => "repeat",
            Self::Invalid { type_name } => type_name,
        }
    }
}

impl From<&str> for Event {
    fn from(key: &str) -> Self {
        Self::press(key)
    }
}

impl From<String> for Event {
    fn from(key: String) -> Self {
        Self::press(key)
    }
}

/// Decode a sequence from JSON.
///
/// `null` decodes to the empty sequence.
pub fn parse_sequence(json: &str) -> Result<Sequence, ParseError> {
    let sequence: Option<Sequence> = serde_json::from_str(json)?;
    Ok(sequence.unwrap_or_default())
}

/// `type` rendered for an event object that has none.
const UNDEFINED_TYPE: &str = "undefined";

impl TryFrom<Value> for Event {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut object = match value {
            Value::String(key) => return Ok(Self::press(key)),
            Value::Object(object) => object,
            _ => return Ok(Self::Invalid { type_name: UNDEFINED_TYPE.to_string() }),
        };

        let type_name = match object.remove("type") {
            Some(Value::String(name)) => name,
            Some(other) => other.to_string(),
            None => UNDEFINED_TYPE.to_string(),
        };

        // Only recognized types validate their fields
        match type_name.as_str() {
            "press" => {
                let key = take_key(&mut object, "press")?;
                let events = match object.remove("events") {
                    None | Some(Value::Null) => Vec::new(),
                    Some(events) => serde_json::from_value(events)
                        .map_err(|e| format!("press \"events\": {e}"))?,
                };
                Ok(Self::Press { key, events })
            },
            "wait" => {
                let ms = object
                    .get("ms")
                    .and_then(Value::as_f64)
                    .ok_or("wait event requires numeric \"ms\"")?;
                Ok(Self::Wait { duration: wait_duration(ms)? })
            },
            "repeat" => {
                let key = take_key(&mut object, "repeat")?;
                let count = object
                    .get("count")
                    .and_then(Value::as_u64)
                    .ok_or("repeat event requires a non-negative integer \"count\"")?;
                let count =
                    u32::try_from(count).map_err(|_| format!("repeat count {count} too large"))?;
                Ok(Self::Repeat { key, count })
            },
            _ => Ok(Self::Invalid { type_name }),
        }
    }
}

fn take_key(object: &mut Map<String, Value>, kind: &str) -> Result<String, String> {
    match object.remove("key") {
        Some(Value::String(key)) => Ok(key),
        _ => Err(format!("{kind} event requires a string \"key\"")),
    }
}

/// Pause length for a `ms` value, which may be fractional.
fn wait_duration(ms: f64) -> Result<Duration, String> {
    if !ms.is_finite() || ms < 0.0 {
        return Err(format!("wait of {ms}ms is not a valid delay"));
    }
    Duration::try_from_secs_f64(ms / 1000.0).map_err(|e| format!("wait of {ms}ms: {e}"))
}
