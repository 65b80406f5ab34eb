//! Error types for hookmark.

use thiserror::Error;

/// Result type alias using hookmark's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for hookmark operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Bookmark node not found
    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(String),

    /// Invalid input (rejected tree mutation, malformed settings)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The bookmark store could not answer a lookup
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
