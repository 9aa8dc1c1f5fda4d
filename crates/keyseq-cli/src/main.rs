//! keyseq replay tool.
//!
//! Runs a key sequence through the interpreter and prints every keyboard
//! event it dispatches, one per line.
//!
//! # Usage
//!
//! ```bash
//! # Inline sequence, text output
//! keyseq --inline '["ctrl", {"type": "press", "key": "a"}]'
//!
//! # Sequence file with a custom key table, JSON lines
//! keyseq --sequence keys.json --keymap layout.json --format json
//! ```

mod input;
mod output;

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use keyseq_core::{Interpreter, InterpreterConfig, RepeatPolicy, SystemEnv, Target};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    input::{SequenceSource, load_sequence, load_table},
    output::{OutputFormat, WriterDispatcher},
};

/// Replay a key sequence and print the dispatched keyboard events
#[derive(Parser, Debug)]
#[command(name = "keyseq")]
#[command(about = "Replay a key sequence and print the dispatched keyboard events")]
#[command(version)]
struct Args {
    /// Path to a JSON sequence file (`-` reads stdin)
    #[arg(short, long, conflicts_with = "inline", required_unless_present = "inline")]
    sequence: Option<PathBuf>,

    /// Sequence as inline JSON
    #[arg(short, long)]
    inline: Option<String>,

    /// JSON object of key name to key code, replacing the standard table
    #[arg(short, long)]
    keymap: Option<PathBuf>,

    /// Label of the element events are dispatched at
    #[arg(short, long, default_value = "document")]
    target: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Fail when a repeat appears outside a press
    #[arg(long)]
    strict_repeat: bool,

    /// Do not yield to the scheduler after each dispatch
    #[arg(long)]
    no_yield: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn source(&self) -> SequenceSource {
        match (&self.inline, &self.sequence) {
            (Some(json), _) => SequenceSource::Inline(json.clone()),
            (None, Some(path)) => SequenceSource::File(path.clone()),
            (None, None) => SequenceSource::Inline("null".to_string()),
        }
    }

    fn config(&self) -> InterpreterConfig {
        InterpreterConfig {
            repeat_policy: if self.strict_repeat { RepeatPolicy::Reject } else { RepeatPolicy::Allow },
            yield_after_dispatch: !self.no_yield,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let sequence = load_sequence(&args.source())?;
    let table = load_table(args.keymap.as_deref())?;
    tracing::debug!(events = sequence.len(), keys = table.len(), "loaded input");

    let dispatcher = WriterDispatcher::new(std::io::stdout(), args.format);
    let mut interpreter =
        Interpreter::new(Arc::new(table), dispatcher, SystemEnv::new()).with_config(args.config());

    interpreter.run(&Target::element(args.target.clone()), &sequence).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn inline_wins_and_maps_to_config() {
        let args = Args::parse_from(["keyseq", "--inline", "[\"a\"]", "--strict-repeat", "--no-yield"]);

        assert_eq!(args.source(), SequenceSource::Inline("[\"a\"]".to_string()));
        let config = args.config();
        assert_eq!(config.repeat_policy, RepeatPolicy::Reject);
        assert!(!config.yield_after_dispatch);
    }

    #[test]
    fn sequence_file_and_defaults() {
        let args = Args::parse_from(["keyseq", "--sequence", "keys.json"]);

        assert_eq!(args.source(), SequenceSource::File(PathBuf::from("keys.json")));
        assert_eq!(args.target, "document");
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.config().repeat_policy, RepeatPolicy::Allow);
    }

    #[test]
    fn sequence_is_required() {
        assert!(Args::try_parse_from(["keyseq"]).is_err());
        assert!(Args::try_parse_from(["keyseq", "-s", "a.json", "-i", "[]"]).is_err());
    }
}
