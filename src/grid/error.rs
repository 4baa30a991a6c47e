use thiserror::Error;

/// Errors raised by the contribution grid core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Structurally bad input such as unsorted days or a bad color
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A single day entry that could not be used. Never fatal, the cell
    /// is left empty and rendering continues.
    #[error("malformed day at position {position}: {reason}")]
    MalformedDay { position: usize, reason: String },
}

/// Result type alias for the grid core
pub type Result<T> = std::result::Result<T, GridError>;
