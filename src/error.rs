//! Error types for the Cinedex library.
//!
//! All fallible operations in this crate return [`Result`], whose error type
//! is the [`CinedexError`] enum. The variants follow the failure taxonomy of
//! the system: recoverable allocation failures, malformed corpus rows,
//! protocol violations, and connection-level network errors. A lookup miss
//! is not an error anywhere in this crate; lookups are `Option`-typed.

use std::io;

use thiserror::Error;

/// The main error type for Cinedex operations.
#[derive(Error, Debug)]
pub enum CinedexError {
    /// I/O errors (file operations, sockets, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Structure growth failure; the structure is left valid at its prior
    /// capacity and only the triggering operation is aborted.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// A corpus row that cannot be parsed into a movie record. The row is
    /// skipped; the build continues.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// An unexpected or missing acknowledgement on the wire. The session is
    /// aborted and the connection closed; the server keeps running.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// Connection-level failure. Aborts the affected session only.
    #[error("network error: {0}")]
    Network(String),

    /// Index-related errors
    #[error("index error: {0}")]
    Index(String),

    /// Corpus-related errors (unknown document id, unreadable row, etc.)
    #[error("corpus error: {0}")]
    Corpus(String),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with CinedexError.
pub type Result<T> = std::result::Result<T, CinedexError>;

impl CinedexError {
    /// Create a new allocation error.
    pub fn allocation<S: Into<String>>(msg: S) -> Self {
        CinedexError::Allocation(msg.into())
    }

    /// Create a new malformed record error.
    pub fn malformed_record<S: Into<String>>(msg: S) -> Self {
        CinedexError::MalformedRecord(msg.into())
    }

    /// Create a new protocol violation error.
    pub fn protocol<S: Into<String>>(msg: S) -> Self {
        CinedexError::Protocol(msg.into())
    }

    /// Create a new network error.
    pub fn network<S: Into<String>>(msg: S) -> Self {
        CinedexError::Network(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        CinedexError::Index(msg.into())
    }

    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        CinedexError::Corpus(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        CinedexError::InvalidArgument(msg.into())
    }
}
