//! Error types for corpus I/O.
//!
//! The reader/writer contract distinguishes three failure classes:
//! - [`OpenError`]: a stream could not be opened (missing file, permissions, ...)
//! - [`ReadError`]: a scan failed part-way (I/O failure or malformed line)
//! - [`WriteError`]: a record could not be written (stream closed or I/O failure)
//!
//! [`PipelineError`] aggregates them for the pipeline-level entrypoints.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A stream could not be opened for reading or writing.
#[derive(Debug, Error)]
#[error("cannot open {} for {mode}", .path.display())]
pub struct OpenError {
    pub path: PathBuf,
    pub mode: OpenMode,
    #[source]
    pub source: io::Error,
}

impl OpenError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            mode: OpenMode::Read,
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            mode: OpenMode::Write,
            source,
        }
    }
}

/// Direction of a failed open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
}

impl std::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenMode::Read => f.write_str("reading"),
            OpenMode::Write => f.write_str("writing"),
        }
    }
}

/// A scan failed after the stream was opened. Terminal for the current scan.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("read line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("malformed record at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// A record could not be written.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("write attempted on a stream that is not open")]
    NotOpen,

    #[error("write to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("serialize record for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Any failure surfaced by [`Pipeline`](crate::Pipeline) entrypoints.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Open(#[from] OpenError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// An option string or option file could not be interpreted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("option `{0}` is not of the form key=value")]
    MissingSeparator(String),

    #[error("option `{key}` has invalid value `{value}`")]
    InvalidValue { key: String, value: String },
}
