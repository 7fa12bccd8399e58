//! Error types for record stores.

use thiserror::Error;

/// Errors that can occur when talking to a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness or other integrity constraint was violated.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The database reported an error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A blocking storage task did not complete.
    #[error("storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
