//! Fuzz target for sequence JSON decoding
//!
//! This fuzzer feeds arbitrary bytes to the sequence decoder and replays
//! whatever decodes on the simulated interpreter.
//!
//! The decoder and interpreter should handle all inputs gracefully, either:
//! - Returning a structured error
//! - Dispatching a stream that satisfies the standard invariants
//! - Never panicking

#![no_main]

use keyseq_core::{InterpreterConfig, Target, parse_sequence};
use keyseq_harness::{InvariantRegistry, SimElement, sim_interpreter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(sequence) = parse_sequence(json) else {
        return;
    };

    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let (mut interp, recorder) = sim_interpreter(InterpreterConfig::default());
    let _ = runtime.block_on(interp.run(&Target::element(SimElement(0)), &sequence));

    InvariantRegistry::standard().assert_all(&recorder.events(), "decoded sequence");
});
