//! In-memory record store (non-persistent).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use taskpoll_core::{NewRecord, Record};

use crate::{RecordStore, StoreError};

#[derive(Default)]
struct Records {
    by_id: HashMap<i64, Record>,
    /// code -> id, mirrors the unique index a database would hold.
    by_code: HashMap<String, i64>,
    last_id: i64,
}

/// Record store backed by a process-local map.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn save(&self, record: NewRecord) -> Result<Record, StoreError> {
        let mut records = self.records.write().await;

        if records.by_code.contains_key(&record.code) {
            return Err(StoreError::Constraint(format!(
                "duplicate code '{}'",
                record.code
            )));
        }

        records.last_id += 1;
        let record = record.with_id(records.last_id);
        records.by_code.insert(record.code.clone(), record.id);
        records.by_id.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Record>, StoreError> {
        Ok(self.records.read().await.by_id.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Record>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .by_code
            .get(code)
            .and_then(|id| records.by_id.get(id))
            .cloned())
    }

    async fn delete(&self, record: &Record) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if let Some(removed) = records.by_id.remove(&record.id) {
            records.by_code.remove(&removed.code);
        }
        Ok(())
    }
}
