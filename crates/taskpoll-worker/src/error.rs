//! Worker errors.

use taskpoll_core::CoreError;
use taskpoll_store::StoreError;
use thiserror::Error;

/// A fault raised inside a handler. The runner maps every fault to a
/// FAILED result; it is never propagated further.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Input(#[from] CoreError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors building a worker registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Task type '{0}' is already registered")]
    DuplicateTaskType(String),

    #[error("Task type name must not be empty")]
    EmptyTaskType,
}

/// Errors starting a task runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("thread_count must be at least 1")]
    InvalidThreadCount,

    #[error("report_max_attempts must be at least 1")]
    InvalidReportAttempts,

    #[error("No task types registered")]
    NoTaskTypes,
}
