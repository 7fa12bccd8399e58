//! Record store clients.
//!
//! Provides the `RecordStore` contract used by task handlers, with two
//! backends:
//! - `memory`: In-memory storage (non-persistent, for testing)
//! - `sqlite`: SQLite database, one table per catalog

pub mod error;
mod memory;
mod sqlite;

use async_trait::async_trait;
use taskpoll_core::{NewRecord, Record};

pub use error::StoreError;
pub use memory::InMemoryRecordStore;
pub use sqlite::SqliteRecordStore;

/// CRUD access to one catalog's records.
///
/// Implementations are shared between concurrently running handlers and
/// must be safe to call from many tasks at once. Uniqueness of `code` is
/// enforced by the store itself.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record and return it with its assigned id.
    async fn save(&self, record: NewRecord) -> Result<Record, StoreError>;

    /// Look up a record by surrogate id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Record>, StoreError>;

    /// Look up a record by business code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Record>, StoreError>;

    /// Delete a record. Deleting an absent record is not an error.
    async fn delete(&self, record: &Record) -> Result<(), StoreError>;
}
