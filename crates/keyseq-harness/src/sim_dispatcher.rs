//! Recording dispatcher implementing the Dispatcher trait.
//!
//! `RecordingDispatcher` stands in for a UI binding in deterministic tests.
//! It implements [`Dispatcher`] so the same [`keyseq_core::Interpreter`]
//! runs against it and against a real binding.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use keyseq_core::{Dispatcher, Environment, KeyEventKind, KeyboardEvent};
use serde::Serialize;
use thiserror::Error;

use crate::SimEnv;

/// Trivial element handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SimElement(pub u64);

/// One dispatched event as observed by the simulated target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recorded {
    /// Element the event was dispatched at.
    pub element: SimElement,
    /// The event itself.
    pub event: KeyboardEvent,
    /// Virtual time of dispatch.
    pub at: Duration,
}

/// Error type for the recording dispatcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimDispatchError {
    /// Failure injected with [`RecordingDispatcher::fail_on`].
    #[error("injected failure on {kind} \"{key}\"")]
    Injected {
        /// Kind that triggered the failure.
        kind: KeyEventKind,
        /// Key that triggered the failure.
        key: String,
    },
}

type Listener = Arc<dyn Fn(&Recorded) + Send + Sync>;

#[derive(Default)]
struct SharedState {
    records: Vec<Recorded>,
    fail_on: Option<(KeyEventKind, String)>,
}

/// Dispatcher that records every event it receives.
///
/// Clones share the recording, so a test can keep one handle for
/// inspection while the interpreter owns another.
#[derive(Clone)]
pub struct RecordingDispatcher {
    state: Arc<Mutex<SharedState>>,
    clock: SimEnv,
    listener: Option<Listener>,
}

impl Default for RecordingDispatcher {
    fn default() -> Self {
        Self::new(SimEnv::new())
    }
}

impl RecordingDispatcher {
    /// Create a dispatcher timestamping with `clock`.
    pub fn new(clock: SimEnv) -> Self {
        Self { state: Arc::new(Mutex::new(SharedState::default())), clock, listener: None }
    }

    /// Call `listener` after each recorded event, like a DOM event handler.
    #[must_use]
    pub fn with_listener(mut self, listener: impl Fn(&Recorded) + Send + Sync + 'static) -> Self {
        self.listener = Some(Arc::new(listener));
        self
    }

    /// Fail the next dispatch matching `kind` and `key`.
    ///
    /// The failing event is not recorded.
    pub fn fail_on(&self, kind: KeyEventKind, key: impl Into<String>) {
        self.lock().fail_on = Some((kind, key.into()));
    }

    /// All records so far.
    pub fn records(&self) -> Vec<Recorded> {
        self.lock().records.clone()
    }

    /// All recorded events, without element and time.
    pub fn events(&self) -> Vec<KeyboardEvent> {
        self.lock().records.iter().map(|r| r.event.clone()).collect()
    }

    /// Take all records, leaving the recording empty.
    pub fn take_records(&self) -> Vec<Recorded> {
        std::mem::take(&mut self.lock().records)
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Dispatcher for RecordingDispatcher {
    type Element = SimElement;
    type Error = SimDispatchError;

    async fn dispatch(
        &mut self,
        element: SimElement,
        event: KeyboardEvent,
    ) -> Result<(), SimDispatchError> {
        let record = {
            let mut state = self.lock();

            let injected = state
                .fail_on
                .as_ref()
                .is_some_and(|(kind, key)| *kind == event.kind && *key == event.key);
            if injected {
                state.fail_on = None;
                return Err(SimDispatchError::Injected { kind: event.kind, key: event.key });
            }

            let record = Recorded { element, event, at: self.clock.now() };
            state.records.push(record.clone());
            record
        };

        tracing::trace!(element = record.element.0, event = %record.event, "recorded");
        if let Some(listener) = &self.listener {
            listener(&record);
        }
        Ok(())
    }
}
