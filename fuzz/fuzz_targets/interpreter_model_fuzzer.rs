//! Fuzz target comparing the interpreter against the reference model
//!
//! Inputs are arbitrary event trees over a small key set that includes an
//! unknown key and unknown event types, run under either repeat policy.
//!
//! Checks:
//! - Dispatched events and their virtual times equal the model's
//! - The run fails exactly when and how the model predicts

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use keyseq_core::{Event, InterpreterConfig, KeyCodeTable, RepeatPolicy, Target};
use keyseq_harness::{ModelEvent, SimElement, expected_dispatches, sim_interpreter_with_table};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    strict: bool,
    events: Vec<ModelEvent>,
}

fuzz_target!(|input: Input| {
    let policy = if input.strict { RepeatPolicy::Reject } else { RepeatPolicy::Allow };
    let sequence: Vec<Event> = input.events.into_iter().map(ModelEvent::into_event).collect();
    let table = Arc::new(KeyCodeTable::standard());

    let model = expected_dispatches(&sequence, &table, policy);

    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let config = InterpreterConfig { repeat_policy: policy, ..InterpreterConfig::default() };
    let (mut interp, recorder) = sim_interpreter_with_table(table, config);
    let result = runtime.block_on(interp.run(&Target::element(SimElement(0)), &sequence));

    let records = recorder.records();
    let events: Vec<_> = records.iter().map(|r| r.event.clone()).collect();
    let times: Vec<_> = records.iter().map(|r| r.at).collect();
    assert_eq!(events, model.events);
    assert_eq!(times, model.times);

    match (model.failure, result) {
        (None, Ok(())) => {},
        (Some(failure), Err(error)) => assert!(failure.matches(&error), "{failure:?} vs {error}"),
        (expected, actual) => panic!("expected {expected:?}, got {actual:?}"),
    }
});
