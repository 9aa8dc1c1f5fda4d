//! Deterministic simulation harness for keyseq.
//!
//! Virtual-clock implementations of the Environment and Dispatcher traits
//! for reproducible tests of the sequence interpreter.
//!
//! # Model-Based Testing
//!
//! The `model` module computes the expected event stream of a sequence
//! independently of the interpreter. Tests run both and compare.
//!
//! # Invariant Testing
//!
//! The `invariants` module checks properties every dispatched stream must
//! satisfy. Use [`InvariantRegistry::standard()`] for the common set.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use keyseq_core::{Interpreter, InterpreterConfig, KeyCodeTable};

pub mod invariants;
pub mod model;
pub mod sim_dispatcher;
pub mod sim_env;

pub use invariants::{
    Invariant, InvariantKind, InvariantRegistry, InvariantResult, KeyPressFollowsKeyDown,
    KeyUpMatchesKeyDown, ModifierConsistency, RepeatNeverKeyUp, Violation,
};
pub use model::{ModelEvent, ModelFailure, ModelKey, ModelOutcome, expected_dispatches};
pub use sim_dispatcher::{RecordingDispatcher, Recorded, SimDispatchError, SimElement};
pub use sim_env::SimEnv;

/// Interpreter wired to a recording dispatcher on a shared virtual clock.
pub type SimInterpreter = Interpreter<RecordingDispatcher, SimEnv>;

/// Build a simulated interpreter using the standard key table.
///
/// Returns the interpreter and a handle to its recording.
pub fn sim_interpreter(config: InterpreterConfig) -> (SimInterpreter, RecordingDispatcher) {
    sim_interpreter_with_table(Arc::new(KeyCodeTable::standard()), config)
}

/// Build a simulated interpreter using `table`.
pub fn sim_interpreter_with_table(
    table: Arc<KeyCodeTable>,
    config: InterpreterConfig,
) -> (SimInterpreter, RecordingDispatcher) {
    let env = SimEnv::new();
    let recorder = RecordingDispatcher::new(env.clone());
    let interpreter = Interpreter::new(table, recorder.clone(), env).with_config(config);
    (interpreter, recorder)
}
