//! Error types for the SQL ID core
//!
//! Canonicalization and encoding are total. Only the diagnostic inverse
//! (`decode`) and the I/O edges of the front ends can fail.

use thiserror::Error;

/// SQL ID error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Identifier contains a character outside the base-32 alphabet
    #[error("Invalid identifier: {ch:?} at position {position} is not in the alphabet")]
    InvalidIdentifier { ch: char, position: usize },

    /// Identifier has no digits at all
    #[error("Invalid identifier: empty string")]
    EmptyIdentifier,

    /// Statement source could not be read
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

/// Result type alias for SQL ID operations
pub type Result<T> = std::result::Result<T, Error>;
