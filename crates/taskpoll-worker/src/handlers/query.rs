use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use taskpoll_core::{Task, TaskResult};
use taskpoll_store::RecordStore;

use super::TaskHandler;
use crate::error::HandlerError;

/// Looks up a record by the `id` input and returns it as `info`.
///
/// Always COMPLETED; an unknown id yields `info: null`.
pub struct QueryRecordHandler {
    store: Arc<dyn RecordStore>,
}

impl QueryRecordHandler {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TaskHandler for QueryRecordHandler {
    async fn execute(&self, task: &Task) -> Result<TaskResult, HandlerError> {
        let id = task.input_i64("id")?;

        let info = match self.store.find_by_id(id).await? {
            Some(record) => serde_json::to_value(&record)?,
            None => Value::Null,
        };
        debug!(task_id = %task.task_id, id, found = !info.is_null(), "Queried record");

        Ok(TaskResult::completed(task).with_output("info", info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::InsertRecordHandler;
    use taskpoll_core::TaskStatus;
    use taskpoll_store::InMemoryRecordStore;

    #[tokio::test]
    async fn test_insert_then_query() {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
        let insert = InsertRecordHandler::new(store.clone());
        let query = QueryRecordHandler::new(store);

        let inserted = insert
            .execute(
                &Task::new("insert_product_in_the_chart", "t-1")
                    .with_input("code", "C")
                    .with_input("name", "N")
                    .with_input("description", "D"),
            )
            .await
            .unwrap();
        let id = inserted.output_data["id"].as_i64().unwrap();

        let result = query
            .execute(&Task::new("chart_product_info", "t-2").with_input("id", id.to_string()))
            .await
            .unwrap();

        assert_eq!(result.status, TaskStatus::Completed);
        let info = &result.output_data["info"];
        assert_eq!(info["code"], "C");
        assert_eq!(info["name"], "N");
        assert_eq!(info["description"], "D");
    }

    #[tokio::test]
    async fn test_query_unknown_id_completes_with_null_info() {
        let query = QueryRecordHandler::new(Arc::new(InMemoryRecordStore::new()));

        let result = query
            .execute(&Task::new("chart_product_info", "t-1").with_input("id", "404"))
            .await
            .unwrap();

        assert_eq!(result.status, TaskStatus::Completed);
        assert_eq!(result.output_data.get("info"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_query_non_numeric_id_is_fault() {
        let query = QueryRecordHandler::new(Arc::new(InMemoryRecordStore::new()));

        let err = query
            .execute(&Task::new("chart_product_info", "t-1").with_input("id", "not-a-number"))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Input(_)));
    }
}
