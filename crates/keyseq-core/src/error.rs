//! Error types for sequence decoding and interpretation.
//!
//! Two layers: [`ParseError`] for turning JSON into sequences and key tables,
//! and [`SequenceError`] for failures while a sequence runs. Every
//! [`SequenceError`] is fatal to the run that raised it. Modifier state is
//! not rolled back, so the keys a failed run left "down" are undefined.

use thiserror::Error;

use crate::KeyEventKind;

/// Errors that abort a sequence run.
#[derive(Error, Debug)]
pub enum SequenceError {
    /// An object-shaped event carried an unrecognized `type`
    #[error("invalid event type \"{type_name}\"")]
    InvalidEventType {
        /// The `type` discriminator as written by the caller
        type_name: String,
    },

    /// A key name has no entry in the key code table
    #[error("invalid key \"{key}\"")]
    InvalidKey {
        /// The key name that failed to resolve
        key: String,
    },

    /// A repeat was reached outside a press under [`crate::RepeatPolicy::Reject`]
    #[error("repeat of \"{key}\" outside of a press")]
    MisplacedRepeat {
        /// Key the repeat would have emitted
        key: String,
    },

    /// The dispatch collaborator rejected an event
    #[error("dispatch of {kind} for \"{key}\" failed: {source}")]
    Dispatch {
        /// Kind of the event being dispatched
        kind: KeyEventKind,
        /// Key name of the event being dispatched
        key: String,
        /// Error reported by the dispatcher
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SequenceError {
    /// Returns true if the caller supplied bad data.
    ///
    /// Input errors are reproducible: running the same sequence again fails
    /// at the same point. Dispatch errors come from the UI binding instead.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::Dispatch { .. })
    }
}

/// Errors decoding sequences or key code tables.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Input is not valid JSON or does not match the expected shape
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The same key name was registered twice
    #[error("duplicate key name \"{name}\"")]
    DuplicateKeyName {
        /// Name registered more than once
        name: String,
    },

    /// A key name was empty
    #[error("empty key name for code {code}")]
    EmptyKeyName {
        /// Code the empty name was mapped to
        code: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_mistakes_are_input_errors() {
        assert!(SequenceError::InvalidEventType { type_name: "tap".into() }.is_input_error());
        assert!(SequenceError::InvalidKey { key: "nope".into() }.is_input_error());
        assert!(SequenceError::MisplacedRepeat { key: "a".into() }.is_input_error());
    }

    #[test]
    fn dispatch_failures_are_not_input_errors() {
        let err = SequenceError::Dispatch {
            kind: KeyEventKind::KeyUp,
            key: "a".into(),
            source: "element detached".into(),
        };

        assert!(!err.is_input_error());
        assert_eq!(err.to_string(), "dispatch of keyup for \"a\" failed: element detached");
    }

    #[test]
    fn messages_name_the_offending_input() {
        let err = SequenceError::InvalidEventType { type_name: "tap".into() };
        assert_eq!(err.to_string(), "invalid event type \"tap\"");

        let err = SequenceError::InvalidKey { key: "hyper".into() };
        assert_eq!(err.to_string(), "invalid key \"hyper\"");
    }
}
