use std::io;

use thiserror::Error;

/// Unified error type for the table writer and reader.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error from disk operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Data corruption detected (checksum mismatch, bad format, etc).
    #[error("Corruption: {0}")]
    Corruption(String),
    /// The caller broke the writer/reader contract (key order, state, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub(crate) fn corruption(msg: impl Into<String>) -> Self {
        Error::Corruption(msg.into())
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

/// Result type alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;
