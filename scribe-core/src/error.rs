//! Error types for scribe-core organized by processing stage.

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline error variants organized by processing stage.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration stage error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Recognizer input stage error
    #[error(transparent)]
    Input(#[from] InputError),

    /// Serialization and persistence stage error
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Configuration errors, raised before any processing begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Word limit per segment must be positive
    #[error("invalid max words: {0} (must be at least 1)")]
    InvalidMaxWords(usize),

    /// Output format name not recognized
    #[error("unknown output format: {0:?} (expected \"json\" or \"srt\")")]
    UnknownFormat(String),
}

/// Malformed recognizer records and unreadable transcript files.
#[derive(Debug, Error)]
pub enum InputError {
    /// Segment record without usable timing or text
    #[error("malformed segment at index {index}: {fault}")]
    MalformedSegment { index: usize, fault: Fault },

    /// Word record without usable timing or text
    #[error("malformed word at index {index} of segment {segment}: {fault}")]
    MalformedWord {
        segment: usize,
        index: usize,
        fault: Fault,
    },

    /// Subtitle block that cannot be parsed
    #[error("malformed subtitle at line {line}: {reason}")]
    MalformedSubtitle { line: usize, reason: String },

    /// JSON document does not match the expected shape
    #[error("failed to decode json")]
    Decode(#[source] serde_json::Error),
}

/// What is wrong with a single timed record.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Fault {
    #[error("missing start")]
    MissingStart,

    #[error("missing end")]
    MissingEnd,

    #[error("missing text")]
    MissingText,

    #[error("{field} is not a number")]
    NotNumeric { field: &'static str },

    #[error("text is not a string")]
    NotText,

    #[error("timestamp is not a finite number")]
    NonFinite,

    #[error("negative start: {0}s")]
    NegativeStart(f64),

    #[error("end {end}s precedes start {start}s")]
    EndBeforeStart { start: f64, end: f64 },

    #[error("start {start}s precedes previous start {previous}s")]
    OutOfOrder { previous: f64, start: f64 },
}

/// Serialization and persistence errors.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Destination could not be created, written, or finalized
    #[error("failed to write {path:?}")]
    DestinationWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding failed
    #[error("failed to encode json")]
    Encode(#[source] serde_json::Error),
}

/// Result type alias for scribe-core operations.
pub type Result<T> = std::result::Result<T, Error>;
