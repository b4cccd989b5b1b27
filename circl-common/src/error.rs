//! Common error types for Circl

use thiserror::Error;

/// Common result type for Circl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the catalog generator and the server
#[derive(Error, Debug)]
pub enum Error {
    /// Requested resource, condition or directory is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or incomplete input; message lists every violation
    #[error("{0}")]
    Validation(String),

    /// Backing file could not be read, parsed or written
    #[error("{0}")]
    Storage(String),

    /// Directory name does not encode a condition
    #[error("Unparsable condition identifier: {0}")]
    UnparsableIdentifier(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
