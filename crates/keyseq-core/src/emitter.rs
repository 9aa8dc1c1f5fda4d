//! Event emitter.
//!
//! Turns one `(kind, key)` pair into a [`KeyboardEvent`] stamped with the key
//! code and the current modifier snapshot, and hands it to the
//! [`Dispatcher`].

use crate::{
    Dispatcher, KeyCodeTable, KeyEventKind, KeyboardEvent, ModifierState, SequenceError, Target,
};

/// Builds and dispatches keyboard events for one sequence run.
///
/// Owns the run's [`ModifierState`]; a fresh emitter starts with every
/// modifier released.
pub struct Emitter<'a, D: Dispatcher> {
    table: &'a KeyCodeTable,
    dispatcher: &'a mut D,
    target: &'a Target<D::Element>,
    modifiers: ModifierState,
    dispatched: usize,
}

impl<'a, D: Dispatcher> Emitter<'a, D> {
    /// Create an emitter with all modifiers released.
    pub fn new(
        table: &'a KeyCodeTable,
        dispatcher: &'a mut D,
        target: &'a Target<D::Element>,
    ) -> Self {
        Self { table, dispatcher, target, modifiers: ModifierState::new(), dispatched: 0 }
    }

    /// Current modifier snapshot.
    pub fn modifiers(&self) -> ModifierState {
        self.modifiers.snapshot()
    }

    /// Number of events dispatched so far.
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Dispatch one `kind` event for `key`.
    ///
    /// The key is resolved before anything else, so an unknown key fails
    /// without touching modifier state. Key-down and key-up update the
    /// modifiers before the event is built: a modifier's own key-down already
    /// reports it as held, its key-up reports it released.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::InvalidKey`] if `key` is not in the table
    /// - [`SequenceError::Dispatch`] if the dispatcher fails
    pub async fn fire(
        &mut self,
        kind: KeyEventKind,
        key: &str,
        repeat: bool,
    ) -> Result<(), SequenceError> {
        let key_code =
            self.table.code(key).ok_or_else(|| SequenceError::InvalidKey { key: key.to_string() })?;

        match kind {
            KeyEventKind::KeyDown => self.modifiers.set_modifier(key, true),
            KeyEventKind::KeyUp => self.modifiers.set_modifier(key, false),
            KeyEventKind::KeyPress => {},
        }

        let event = KeyboardEvent {
            kind,
            key: key.to_string(),
            key_code,
            modifiers: self.modifiers.snapshot(),
            repeat,
        };
        tracing::debug!(
            kind = %kind,
            key,
            key_code,
            ctrl = event.modifiers.ctrl_key,
            shift = event.modifiers.shift_key,
            alt = event.modifiers.alt_key,
            meta = event.modifiers.meta_key,
            repeat,
            "dispatching key event"
        );

        let element = self.target.resolve();
        self.dispatcher.dispatch(element, event).await.map_err(|e| SequenceError::Dispatch {
            kind,
            key: key.to_string(),
            source: Box::new(e),
        })?;

        self.dispatched += 1;
        Ok(())
    }
}
