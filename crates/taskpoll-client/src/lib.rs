//! Orchestrator client library for taskpoll workers.
//!
//! Workers only need two calls from the orchestrator: claim the next task
//! of a type, and report the result of a task. `OrchestratorClient` is that
//! boundary; `HttpOrchestratorClient` speaks the Conductor REST API.

pub mod error;
pub mod http;

use async_trait::async_trait;
use taskpoll_core::{Task, TaskResult};

pub use error::ClientError;
pub use http::HttpOrchestratorClient;

/// Network boundary to the workflow orchestrator.
#[async_trait]
pub trait OrchestratorClient: Send + Sync {
    /// Claim the next task of `task_type`, if one is runnable.
    async fn poll(&self, task_type: &str) -> Result<Option<Task>, ClientError>;

    /// Report a task's result.
    async fn report_result(&self, result: &TaskResult) -> Result<(), ClientError>;
}
