//! Core errors.

use thiserror::Error;

/// Errors raised while reading task input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required input key is absent.
    #[error("Missing input '{0}'")]
    MissingInput(String),

    /// An input key holds a value of the wrong type.
    #[error("Input '{key}' must be {expected}")]
    InvalidInputType { key: String, expected: &'static str },

    /// An input key holds a value that cannot be parsed.
    #[error("Invalid input '{key}': {reason}")]
    InvalidInput { key: String, reason: String },
}
