//! SQLite-backed record store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use tokio::sync::Mutex;
use tracing::info;

use taskpoll_core::{Catalog, NewRecord, Record};

use crate::{RecordStore, StoreError};

/// Record store keeping one catalog in a SQLite table.
///
/// Every call runs on the blocking pool; the connection is shared behind a
/// mutex, so statements on one store are serialized.
#[derive(Clone)]
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
    catalog: Catalog,
}

impl SqliteRecordStore {
    /// Open (or create) a database file and ensure the catalog table exists.
    pub async fn open(path: impl AsRef<Path>, catalog: Catalog) -> Result<Self, StoreError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let shown = path.display().to_string();

        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            create_table(&conn, catalog)?;
            Ok::<_, StoreError>(conn)
        })
        .await??;

        info!(path = %shown, table = catalog.table_name(), "Opened SQLite record store");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            catalog,
        })
    }

    /// Open a private in-memory database.
    pub async fn open_in_memory(catalog: Catalog) -> Result<Self, StoreError> {
        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open_in_memory()?;
            create_table(&conn, catalog)?;
            Ok::<_, StoreError>(conn)
        })
        .await??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            catalog,
        })
    }
}

fn create_table(conn: &Connection, catalog: Catalog) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT NOT NULL
        );",
        catalog.table_name()
    ))
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
    })
}

fn map_write_error(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            return StoreError::Constraint(
                message.clone().unwrap_or_else(|| failure.to_string()),
            );
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn save(&self, record: NewRecord) -> Result<Record, StoreError> {
        let conn = self.conn.clone();
        let table = self.catalog.table_name();

        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            conn.execute(
                &format!(
                    "INSERT INTO {} (code, name, description) VALUES (?1, ?2, ?3)",
                    table
                ),
                params![record.code, record.name, record.description],
            )
            .map_err(map_write_error)?;
            Ok::<_, StoreError>(record.with_id(conn.last_insert_rowid()))
        })
        .await?
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Record>, StoreError> {
        let conn = self.conn.clone();
        let table = self.catalog.table_name();

        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let record = conn
                .query_row(
                    &format!(
                        "SELECT id, code, name, description FROM {} WHERE id = ?1",
                        table
                    ),
                    params![id],
                    row_to_record,
                )
                .optional()?;
            Ok::<_, StoreError>(record)
        })
        .await?
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Record>, StoreError> {
        let conn = self.conn.clone();
        let table = self.catalog.table_name();
        let code = code.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let record = conn
                .query_row(
                    &format!(
                        "SELECT id, code, name, description FROM {} WHERE code = ?1",
                        table
                    ),
                    params![code],
                    row_to_record,
                )
                .optional()?;
            Ok::<_, StoreError>(record)
        })
        .await?
    }

    async fn delete(&self, record: &Record) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        let table = self.catalog.table_name();
        let id = record.id;

        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            conn.execute(&format!("DELETE FROM {} WHERE id = ?1", table), params![id])
                .map_err(map_write_error)?;
            Ok::<_, StoreError>(())
        })
        .await?
    }
}
