//! Worker registry - maps task types to handlers.

use std::sync::Arc;

use crate::error::RegistryError;
use crate::handlers::TaskHandler;

/// One registered task type.
#[derive(Clone)]
pub struct Registration {
    pub task_type: String,
    pub handler: Arc<dyn TaskHandler>,
}

/// Task types served by one runner, in registration order.
#[derive(Clone, Default)]
pub struct WorkerRegistry {
    entries: Vec<Registration>,
}

impl WorkerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a task type. Task types must be unique.
    pub fn register(
        &mut self,
        task_type: impl Into<String>,
        handler: Arc<dyn TaskHandler>,
    ) -> Result<(), RegistryError> {
        let task_type = task_type.into();
        if task_type.trim().is_empty() {
            return Err(RegistryError::EmptyTaskType);
        }
        if self.get(&task_type).is_some() {
            return Err(RegistryError::DuplicateTaskType(task_type));
        }

        self.entries.push(Registration { task_type, handler });
        Ok(())
    }

    /// Builder form of `register`.
    pub fn with(
        mut self,
        task_type: impl Into<String>,
        handler: Arc<dyn TaskHandler>,
    ) -> Result<Self, RegistryError> {
        self.register(task_type, handler)?;
        Ok(self)
    }

    /// Get the handler for a task type.
    pub fn get(&self, task_type: &str) -> Option<Arc<dyn TaskHandler>> {
        self.entries
            .iter()
            .find(|r| r.task_type == task_type)
            .map(|r| r.handler.clone())
    }

    /// Registered task types.
    pub fn task_types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|r| r.task_type.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::QueryRecordHandler;
    use taskpoll_store::InMemoryRecordStore;

    fn handler() -> Arc<dyn TaskHandler> {
        Arc::new(QueryRecordHandler::new(Arc::new(InMemoryRecordStore::new())))
    }

    #[test]
    fn test_register_and_get() {
        let registry = WorkerRegistry::new()
            .with("chart_product_info", handler())
            .unwrap()
            .with("purchase_product_info", handler())
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.get("chart_product_info").is_some());
        assert!(registry.get("unknown").is_none());
        assert_eq!(
            registry.task_types().collect::<Vec<_>>(),
            vec!["chart_product_info", "purchase_product_info"]
        );
    }

    #[test]
    fn test_duplicate_task_type_rejected() {
        let mut registry = WorkerRegistry::new();
        registry.register("chart_product_info", handler()).unwrap();

        let err = registry
            .register("chart_product_info", handler())
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTaskType(name) if name == "chart_product_info"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_task_type_rejected() {
        let mut registry = WorkerRegistry::new();
        assert!(matches!(
            registry.register("  ", handler()),
            Err(RegistryError::EmptyTaskType)
        ));
        assert!(registry.is_empty());
    }
}
