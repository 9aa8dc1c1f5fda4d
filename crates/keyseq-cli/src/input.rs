//! Loading sequences and key tables from the command line.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use keyseq_core::{KeyCodeTable, ParseError, Sequence, parse_sequence};
use thiserror::Error;

/// Errors loading CLI input.
#[derive(Error, Debug)]
pub enum InputError {
    /// File (or stdin) could not be read
    #[error("cannot read {path}: {source}")]
    Read {
        /// Path that failed, `-` for stdin
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Contents did not decode
    #[error("invalid {what}: {source}")]
    Parse {
        /// What was being decoded
        what: &'static str,
        /// Decoding error
        #[source]
        source: ParseError,
    },
}

/// Where the sequence comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceSource {
    /// JSON given on the command line.
    Inline(String),
    /// JSON file, `-` for stdin.
    File(PathBuf),
}

/// Read and decode the sequence.
pub fn load_sequence(source: &SequenceSource) -> Result<Sequence, InputError> {
    let json = match source {
        SequenceSource::Inline(json) => json.clone(),
        SequenceSource::File(path) => read(path)?,
    };
    parse_sequence(&json).map_err(|source| InputError::Parse { what: "sequence", source })
}

/// Read and decode a key table, or the standard table if `path` is `None`.
pub fn load_table(path: Option<&Path>) -> Result<KeyCodeTable, InputError> {
    let Some(path) = path else {
        return Ok(KeyCodeTable::standard());
    };
    KeyCodeTable::from_json(&read(path)?)
        .map_err(|source| InputError::Parse { what: "key table", source })
}

fn read(path: &Path) -> Result<String, InputError> {
    let result = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        fs::read_to_string(path)
    };
    result.map_err(|source| InputError::Read { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use keyseq_core::Event;

    use super::*;

    #[test]
    fn inline_sequence() {
        let source = SequenceSource::Inline(r#"["a", {"type": "wait", "ms": 5}]"#.into());

        let sequence = load_sequence(&source).unwrap();

        assert_eq!(sequence, vec![Event::press("a"), Event::wait(5)]);
    }

    #[test]
    fn sequence_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"type": "press", "key": "enter"}}]"#).unwrap();

        let source = SequenceSource::File(file.path().to_path_buf());
        let sequence = load_sequence(&source).unwrap();

        assert_eq!(sequence, vec![Event::press("enter")]);
    }

    #[test]
    fn missing_file_reports_path() {
        let source = SequenceSource::File(PathBuf::from("/nonexistent/keys.json"));

        let err = load_sequence(&source).unwrap_err();

        assert!(matches!(err, InputError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/keys.json"));
    }

    #[test]
    fn malformed_sequence_is_parse_error() {
        let err = load_sequence(&SequenceSource::Inline("[".into())).unwrap_err();

        assert!(matches!(err, InputError::Parse { what: "sequence", .. }));
    }

    #[test]
    fn default_table_is_standard() {
        assert_eq!(load_table(None).unwrap(), KeyCodeTable::standard());
    }

    #[test]
    fn table_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"go": 71}}"#).unwrap();

        let table = load_table(Some(file.path())).unwrap();

        assert_eq!(table.code("go"), Some(71));
        assert_eq!(table.len(), 1);
    }
}
