//! Error types for barcache.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Error for malformed time ranges.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// Start is after end.
    #[error("Invalid range: from_t {from_t} > to_t {to_t}")]
    Inverted {
        /// The start timestamp.
        from_t: i64,
        /// The end timestamp.
        to_t: i64,
    },

    /// Start equals end where a non-empty range is required.
    #[error("Invalid range: empty range at {at}")]
    Empty {
        /// The shared start and end timestamp.
        at: i64,
    },
}

/// Error returned when parsing an invalid timeframe string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid timeframe '{0}', expected one of: m1, m5, m15, m30, h1, d1, w1, mn1")]
pub struct TimeframeParseError(pub String);

/// Error returned when parsing an invalid instrument key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstrumentParseError {
    /// The input has no `EXCHANGE:SYMBOL` separator.
    #[error("invalid instrument '{0}', expected EXCHANGE:SYMBOL")]
    MissingSeparator(String),

    /// The exchange or symbol part is empty.
    #[error("invalid instrument part '{0}': must not be empty")]
    EmptyPart(String),

    /// The exchange or symbol contains an unsupported character.
    #[error("invalid instrument part '{input}': unsupported character {ch:?}")]
    InvalidChar {
        /// The offending part.
        input: String,
        /// The first unsupported character.
        ch: char,
    },
}

/// Errors raised by a bar store.
///
/// A store error means the cache cannot make progress, so it fails the
/// whole request.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to determine the application data directory.
    #[error("Failed to determine application data directory")]
    NoDataDir,

    /// Failed to create a directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a directory.
    #[error("Failed to read directory '{path}': {source}")]
    ReadDir {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A persisted bar set could not be parsed.
    #[error("Corrupt bar set file '{path}': {source}")]
    Corrupt {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Failed to serialize a bar set.
    #[error("Failed to serialize bar set: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A range handed to the store is malformed.
    #[error(transparent)]
    Range(#[from] RangeError),

    /// Backend-specific failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Errors raised by an origin gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OriginError {
    /// The request could not be sent or the connection failed.
    #[error("Origin request failed: {0}")]
    Request(String),

    /// The origin answered with an error status after all retries.
    #[error("Origin returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The origin's payload could not be decoded.
    #[error("Origin payload could not be decoded: {0}")]
    Decode(String),

    /// The fetch did not finish in time.
    #[error("Origin fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors raised by a session oracle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The oracle could not answer.
    #[error("Session oracle unavailable: {0}")]
    Unavailable(String),
}
