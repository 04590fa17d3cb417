//! Error types for trial log parsing

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for parser and aggregator operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Failures raised while reading a simulation log.
///
/// The simulator's line grammar is rigid, so none of these are recovered
/// from: each one carries the file, line number and raw line so a log from an
/// incompatible simulator build can be diagnosed directly.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A `Seed` header missing a token at one of its fixed offsets
    #[error("{}:{line_no}: malformed trial header ({reason}): {line:?}", .path.display())]
    MalformedHeader {
        path: PathBuf,
        line_no: usize,
        line: String,
        reason: String,
    },

    /// A data line whose second token is not a numeric turn marker
    #[error("{}:{line_no}: malformed turn marker: {line:?}", .path.display())]
    MalformedTurn {
        path: PathBuf,
        line_no: usize,
        line: String,
    },

    /// A Score or Heat report whose value after the last colon is not a float
    #[error("{}:{line_no}: malformed report value: {line:?}", .path.display())]
    MalformedReport {
        path: PathBuf,
        line_no: usize,
        line: String,
    },

    /// The log could not be opened
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading failed partway through, e.g. on bytes that are not UTF-8
    #[error("{}:{line_no}: failed to read line", .path.display())]
    Read {
        path: PathBuf,
        line_no: usize,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn read(path: impl Into<PathBuf>, line_no: usize, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            line_no,
            source,
        }
    }
}

/// Line-level failure before the file context is attached.
///
/// The pure line classifier knows nothing about paths; the file scanner
/// lifts these into [`ParseError`] with [`LineError::at`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("malformed trial header: {0}")]
    Header(String),
    #[error("malformed turn marker")]
    Turn,
    #[error("malformed report value")]
    Report,
}

impl LineError {
    pub fn at(self, path: &std::path::Path, line_no: usize, line: &str) -> ParseError {
        let path = path.to_path_buf();
        let line = line.to_string();
        match self {
            Self::Header(reason) => ParseError::MalformedHeader {
                path,
                line_no,
                line,
                reason,
            },
            Self::Turn => ParseError::MalformedTurn {
                path,
                line_no,
                line,
            },
            Self::Report => ParseError::MalformedReport {
                path,
                line_no,
                line,
            },
        }
    }
}
