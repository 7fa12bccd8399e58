//! Task handlers.
//!
//! One handler per task type. Each handler gets its record store at
//! construction time and turns a `Task` into a `TaskResult`. Returning
//! `Err` is a fault; the runner maps it to FAILED.

mod delete;
mod insert;
mod query;

use async_trait::async_trait;
use taskpoll_core::{Task, TaskResult};

use crate::error::HandlerError;

pub use delete::DeleteRecordHandler;
pub use insert::InsertRecordHandler;
pub use query::QueryRecordHandler;

/// Business logic bound to one task type.
///
/// Tasks are delivered at least once, so `execute` may see the same
/// logical work more than once.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn execute(&self, task: &Task) -> Result<TaskResult, HandlerError>;
}
