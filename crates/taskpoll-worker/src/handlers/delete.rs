use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use taskpoll_core::{Task, TaskResult};
use taskpoll_store::RecordStore;

use super::TaskHandler;
use crate::error::HandlerError;

/// Deletes the record whose code is given in `productCode`.
///
/// A missing record is a handled FAILED outcome, not a fault. A redelivered
/// delete therefore also reports FAILED.
pub struct DeleteRecordHandler {
    store: Arc<dyn RecordStore>,
}

impl DeleteRecordHandler {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TaskHandler for DeleteRecordHandler {
    async fn execute(&self, task: &Task) -> Result<TaskResult, HandlerError> {
        let code = task.input_str("productCode")?;

        let Some(record) = self.store.find_by_code(code).await? else {
            info!(task_id = %task.task_id, code = %code, "No record to delete");
            return Ok(TaskResult::failed(task));
        };

        let result = TaskResult::completed(task)
            .with_output("name", record.name.clone())
            .with_output("description", record.description.clone());

        self.store.delete(&record).await?;
        info!(task_id = %task.task_id, id = record.id, code = %code, "Deleted record");

        Ok(result)
    }
}
