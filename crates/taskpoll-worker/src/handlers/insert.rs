use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use taskpoll_core::{NewRecord, Task, TaskResult};
use taskpoll_store::RecordStore;

use super::TaskHandler;
use crate::error::HandlerError;

/// Creates a record from the `code`, `name` and `description` inputs.
///
/// No existence check is made; a duplicate code surfaces as a store
/// constraint fault.
pub struct InsertRecordHandler {
    store: Arc<dyn RecordStore>,
}

impl InsertRecordHandler {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TaskHandler for InsertRecordHandler {
    async fn execute(&self, task: &Task) -> Result<TaskResult, HandlerError> {
        let record = NewRecord::new(
            task.input_str("code")?,
            task.input_str("name")?,
            task.input_str("description")?,
        );

        let saved = self.store.save(record).await?;
        info!(task_id = %task.task_id, id = saved.id, code = %saved.code, "Inserted record");

        Ok(TaskResult::completed(task).with_output("id", saved.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpoll_core::{Catalog, CoreError, TaskStatus};
    use taskpoll_store::{InMemoryRecordStore, SqliteRecordStore, StoreError};

    fn insert_task(code: &str) -> Task {
        Task::new("insert_product_in_the_chart", format!("t-{code}"))
            .with_input("code", code)
            .with_input("name", "Widget")
            .with_input("description", "A widget")
    }

    #[tokio::test]
    async fn test_insert_saves_record() {
        let store = Arc::new(InMemoryRecordStore::new());
        let handler = InsertRecordHandler::new(store.clone());

        let result = handler.execute(&insert_task("ABC")).await.unwrap();
        assert_eq!(result.status, TaskStatus::Completed);

        let record = store.find_by_code("ABC").await.unwrap().unwrap();
        assert_eq!(record.name, "Widget");
        assert_eq!(record.description, "A widget");
        assert_eq!(result.output_data["id"], record.id);
    }

    #[tokio::test]
    async fn test_insert_duplicate_code_is_fault() {
        let store = Arc::new(InMemoryRecordStore::new());
        let handler = InsertRecordHandler::new(store);

        handler.execute(&insert_task("ABC")).await.unwrap();
        let err = handler.execute(&insert_task("ABC")).await.unwrap_err();
        assert!(matches!(err, HandlerError::Store(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_insert_missing_input_is_fault() {
        let handler = InsertRecordHandler::new(Arc::new(InMemoryRecordStore::new()));
        let task = Task::new("insert_product_in_the_chart", "t-1").with_input("code", "ABC");

        let err = handler.execute(&task).await.unwrap_err();
        assert!(matches!(err, HandlerError::Input(CoreError::MissingInput(key)) if key == "name"));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_with_distinct_codes() {
        let store = Arc::new(SqliteRecordStore::open_in_memory(Catalog::Chart).await.unwrap());
        let handler = Arc::new(InsertRecordHandler::new(store.clone()));

        let mut handles = Vec::new();
        for i in 0..16 {
            let handler = handler.clone();
            handles.push(tokio::spawn(async move {
                handler.execute(&insert_task(&format!("code-{i}"))).await
            }));
        }
        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            assert_eq!(result.status, TaskStatus::Completed);
        }

        for i in 0..16 {
            let record = store.find_by_code(&format!("code-{i}")).await.unwrap();
            assert!(record.is_some(), "code-{i} was not saved");
        }
    }
}
