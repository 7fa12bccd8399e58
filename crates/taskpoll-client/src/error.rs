//! Error types for the orchestrator client.

use thiserror::Error;

/// Transport-level errors talking to the orchestrator.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to establish connection.
    #[error("connection failed: {0}")]
    Connection(String),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The orchestrator answered with a non-success status.
    #[error("HTTP {status}: {path}")]
    Status { status: u16, path: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
