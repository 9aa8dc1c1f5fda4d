//! Simulated keyboard input for automated UI testing.
//!
//! Replays a declarative list of abstract key events (press, wait, repeat)
//! as a strictly ordered stream of low-level keyboard events against a
//! target element, tracking modifier state across the whole sequence.
//!
//! # Components
//!
//! - [`KeyCodeTable`]: immutable key name to key code mapping
//! - [`ModifierState`]: ctrl/shift/alt/meta flags held during one run
//! - [`Emitter`]: builds and dispatches one [`KeyboardEvent`]
//! - [`Interpreter`]: walks a [`Sequence`] depth-first, one event at a time
//! - [`Dispatcher`] and [`Environment`]: the seams to the UI binding and to
//!   the clock, so the same interpreter runs in production and simulation

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod dispatch;
mod emitter;
mod env;
mod error;
mod event;
mod interpreter;
mod keyboard;
mod keymap;
mod modifiers;

pub use dispatch::{Dispatcher, Target};
pub use emitter::Emitter;
pub use env::{Environment, SystemEnv};
pub use error::{ParseError, SequenceError};
pub use event::{Event, Sequence, parse_sequence};
pub use interpreter::{Interpreter, InterpreterConfig, RepeatPolicy};
pub use keyboard::{KeyEventKind, KeyboardEvent};
pub use keymap::KeyCodeTable;
pub use modifiers::ModifierState;
