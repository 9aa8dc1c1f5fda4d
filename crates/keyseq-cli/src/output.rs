//! Dispatcher that writes events to a stream instead of a UI.

use std::io::{self, Write};

use clap::ValueEnum;
use keyseq_core::{Dispatcher, KeyboardEvent};
use serde::Serialize;

/// Line format for dispatched events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `target<TAB>keydown(a +ctrl)<TAB>65`
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    target: &'a str,
    #[serde(flatten)]
    event: &'a KeyboardEvent,
}

/// Writes one line per dispatched event. Elements are plain labels.
pub struct WriterDispatcher<W> {
    out: W,
    format: OutputFormat,
}

impl<W: Write + Send> WriterDispatcher<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_event(&mut self, target: &str, event: &KeyboardEvent) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{target}\t{event}\t{}", event.key_code)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, &JsonLine { target, event })?;
                writeln!(self.out)?;
            },
        }
        self.out.flush()
    }
}

impl<W: Write + Send> Dispatcher for WriterDispatcher<W> {
    type Element = String;
    type Error = io::Error;

    async fn dispatch(&mut self, element: String, event: KeyboardEvent) -> io::Result<()> {
        self.write_event(&element, &event)
    }
}
