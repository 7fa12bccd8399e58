//! Service profiles - one per deployed catalog service.

use std::sync::Arc;

use taskpoll_core::Catalog;
use taskpoll_store::RecordStore;

use crate::error::RegistryError;
use crate::handlers::{DeleteRecordHandler, InsertRecordHandler, QueryRecordHandler};
use crate::registry::WorkerRegistry;

/// Which catalog service this worker process runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ServiceProfile {
    Chart,
    Purchase,
    Warehouse,
}

impl ServiceProfile {
    /// Catalog the service owns.
    pub fn catalog(&self) -> Catalog {
        match self {
            Self::Chart => Catalog::Chart,
            Self::Purchase => Catalog::Purchase,
            Self::Warehouse => Catalog::Warehouse,
        }
    }

    /// Task type names the service's workflows use.
    pub fn default_task_names(&self) -> TaskNames {
        match self {
            Self::Chart => TaskNames::new(
                "insert_product_in_the_chart",
                "chart_delete_product",
                "chart_product_info",
            ),
            Self::Purchase => TaskNames::new(
                "insert_product_purchase",
                "purchase_delete_product",
                "purchase_product_info",
            ),
            Self::Warehouse => TaskNames::new(
                "insert_product_in_the_warehouse",
                "warehouse_delete_product",
                "warehouse_product_info",
            ),
        }
    }
}

/// Task type names for the insert, delete and query handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNames {
    pub insert: String,
    pub delete: String,
    pub query: String,
}

impl TaskNames {
    pub fn new(
        insert: impl Into<String>,
        delete: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            insert: insert.into(),
            delete: delete.into(),
            query: query.into(),
        }
    }

    /// Replace any name given in an override.
    pub fn with_overrides(
        mut self,
        insert: Option<String>,
        delete: Option<String>,
        query: Option<String>,
    ) -> Self {
        if let Some(name) = insert {
            self.insert = name;
        }
        if let Some(name) = delete {
            self.delete = name;
        }
        if let Some(name) = query {
            self.query = name;
        }
        self
    }
}

/// Build the registry for one catalog, sharing `store` between handlers.
pub fn build_registry(
    names: &TaskNames,
    store: Arc<dyn RecordStore>,
) -> Result<WorkerRegistry, RegistryError> {
    WorkerRegistry::new()
        .with(
            names.insert.clone(),
            Arc::new(InsertRecordHandler::new(store.clone())),
        )?
        .with(
            names.delete.clone(),
            Arc::new(DeleteRecordHandler::new(store.clone())),
        )?
        .with(names.query.clone(), Arc::new(QueryRecordHandler::new(store)))
}
