//! Sequence interpreter.
//!
//! Walks a [`Sequence`] depth-first, left to right, with a single cursor:
//! an event starts only after the previous sibling's whole sub-tree (nested
//! presses, repeats, waits) has resolved. Suspension happens only at waits
//! and at the yield after each dispatch.
//!
//! # Dispatch order
//!
//! ```text
//! press(k, [e1, e2])  ->  keydown(k) keypress(k) <e1> <e2> keyup(k)
//! repeat(k, n)        ->  (keydown(k) keypress(k)) x n
//! wait(ms)            ->  nothing, `ms` later
//! ```

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::{
    Dispatcher, Emitter, Environment, Event, KeyCodeTable, KeyEventKind, SequenceError, Target,
};

/// How to treat a [`Event::Repeat`] that is not nested in a press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepeatPolicy {
    /// Run it like a nested repeat, logging a warning.
    #[default]
    Allow,
    /// Fail the run with [`SequenceError::MisplacedRepeat`] when reached.
    Reject,
}

/// Interpreter configuration.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Treatment of top-level repeats.
    pub repeat_policy: RepeatPolicy,
    /// Yield to the scheduler after every dispatch so listeners can react
    /// before the next event.
    pub yield_after_dispatch: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self { repeat_policy: RepeatPolicy::Allow, yield_after_dispatch: true }
    }
}

/// Replays sequences against a target through a [`Dispatcher`].
///
/// # Type Parameters
///
/// - `D`: UI binding that injects events
/// - `E`: Environment providing delays and yields
///
/// `run` borrows the interpreter mutably, so one interpreter never has two
/// runs in flight. Each run starts with every modifier released.
pub struct Interpreter<D, E>
where
    D: Dispatcher,
    E: Environment,
{
    table: Arc<KeyCodeTable>,
    dispatcher: D,
    env: E,
    config: InterpreterConfig,
}

impl<D, E> Interpreter<D, E>
where
    D: Dispatcher,
    E: Environment,
{
    /// Create an interpreter with the default configuration.
    pub fn new(table: Arc<KeyCodeTable>, dispatcher: D, env: E) -> Self {
        Self { table, dispatcher, env, config: InterpreterConfig::default() }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    /// The dispatcher.
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Consume the interpreter, returning the dispatcher.
    pub fn into_dispatcher(self) -> D {
        self.dispatcher
    }

    /// Run `sequence` against `target`.
    ///
    /// Resolves after the last event and everything nested in it has
    /// resolved. An empty sequence resolves immediately without dispatching.
    ///
    /// # Errors
    ///
    /// The first error aborts the run and every enclosing step; nothing
    /// after the failing event is dispatched. Modifier state is not rolled
    /// back.
    pub async fn run(
        &mut self,
        target: &Target<D::Element>,
        sequence: &[Event],
    ) -> Result<(), SequenceError> {
        if sequence.is_empty() {
            tracing::trace!("empty key sequence");
            return Ok(());
        }

        tracing::info!(events = sequence.len(), "running key sequence");
        let mut session = Session {
            emitter: Emitter::new(&self.table, &mut self.dispatcher, target),
            env: &self.env,
            config: &self.config,
        };

        let result = session.run_list(sequence, 0).await;
        let dispatched = session.emitter.dispatched();
        match &result {
            Ok(()) => tracing::info!(dispatched, "key sequence complete"),
            Err(e) => tracing::warn!(dispatched, error = %e, "key sequence failed"),
        }
        result
    }
}

/// State of one run: the emitter (and its modifiers) plus borrowed context.
struct Session<'a, D: Dispatcher, E> {
    emitter: Emitter<'a, D>,
    env: &'a E,
    config: &'a InterpreterConfig,
}

impl<D, E> Session<'_, D, E>
where
    D: Dispatcher,
    E: Environment,
{
    /// Run `events` in order. `depth` is the number of enclosing presses.
    fn run_list<'s>(
        &'s mut self,
        events: &'s [Event],
        depth: usize,
    ) -> BoxFuture<'s, Result<(), SequenceError>> {
        Box::pin(async move {
            for event in events {
                tracing::trace!(event = event.type_name(), depth, "interpreting event");

                match event {
                    Event::Press { key, events } => {
                        self.fire(KeyEventKind::KeyDown, key, false).await?;
                        self.fire(KeyEventKind::KeyPress, key, false).await?;
                        if !events.is_empty() {
                            self.run_list(events, depth + 1).await?;
                        }
                        self.fire(KeyEventKind::KeyUp, key, false).await?;
                    },
                    Event::Wait { duration } => {
                        tracing::trace!(?duration, "waiting");
                        self.env.sleep(*duration).await;
                    },
                    Event::Repeat { key, count } => {
                        if depth == 0 {
                            match self.config.repeat_policy {
                                RepeatPolicy::Reject => {
                                    return Err(SequenceError::MisplacedRepeat { key: key.clone() });
                                },
                                RepeatPolicy::Allow => {
                                    tracing::warn!(key = %key, "repeat outside of a press");
                                },
                            }
                        }
                        for _ in 0..*count {
                            self.fire(KeyEventKind::KeyDown, key, true).await?;
                            self.fire(KeyEventKind::KeyPress, key, true).await?;
                        }
                    },
                    Event::Invalid { type_name } => {
                        return Err(SequenceError::InvalidEventType {
                            type_name: type_name.clone(),
                        });
                    },
                }
            }
            Ok(())
        })
    }

    async fn fire(
        &mut self,
        kind: KeyEventKind,
        key: &str,
        repeat: bool,
    ) -> Result<(), SequenceError> {
        self.emitter.fire(kind, key, repeat).await?;
        if self.config.yield_after_dispatch {
            self.env.yield_now().await;
        }
        Ok(())
    }
}
