//! Error taxonomy for the record store and its persistence codec.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::record::RecordId;

/// Malformed persisted data. Line numbers are 1-based and point at the
/// line where the offending row starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: expected 5 fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: field `{field}` is not an integer: {value:?}")]
    InvalidInteger {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },

    #[error("line {line}: unexpected text after closing quote")]
    TextAfterQuote { line: usize },

    #[error("line {line}: duplicate record id {id}")]
    DuplicateId { line: usize, id: RecordId },
}

impl ParseError {
    /// Line the error refers to.
    pub const fn line(&self) -> usize {
        match self {
            Self::FieldCount { line, .. }
            | Self::InvalidInteger { line, .. }
            | Self::UnterminatedQuote { line }
            | Self::TextAfterQuote { line }
            | Self::DuplicateId { line, .. } => *line,
        }
    }
}

/// Failure of a record store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data file: {0}")]
    Parse(#[from] ParseError),

    #[error("record with ID {0} not found")]
    NotFound(RecordId),

    #[error("no record ids left to assign")]
    IdSpaceExhausted,

    #[error("record store is closed")]
    Closed,
}

impl StoreError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Short machine-readable kind, used as a metrics label.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Parse(_) => "parse",
            Self::NotFound(_) => "not_found",
            Self::IdSpaceExhausted => "id_space_exhausted",
            Self::Closed => "closed",
        }
    }
}
