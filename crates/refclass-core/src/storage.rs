//! Key-value persistence for annotation snapshots.
//!
//! Each group identifier owns one partition. A partition holds the whole
//! annotation map as a single JSON value and is always overwritten whole.

use std::collections::HashMap;
#[cfg(feature = "sqlite")]
use std::path::Path;
use std::sync::Mutex;

use crate::error::StorageError;

/// Storage key for a group's annotation partition.
///
/// ```
/// use refclass_core::partition_key;
/// assert_eq!(partition_key(Some("4f2a-77")), "classifications_4f2a-77");
/// assert_eq!(partition_key(None), "classifications_all");
/// ```
pub fn partition_key(group: Option<&str>) -> String {
    format!("classifications_{}", group.unwrap_or("all"))
}

/// Durable string key-value store.
pub trait Storage: Send + Sync {
    /// Read a value, `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage (for tests and throwaway sessions).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|e| StorageError::Backend(format!("Mutex poisoned: {}", e)))
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// SQLite-backed storage: one row per partition key.
#[cfg(feature = "sqlite")]
pub struct SqliteStorage {
    conn: Mutex<rusqlite::Connection>,
}

#[cfg(feature = "sqlite")]
impl SqliteStorage {
    const CREATE_TABLE: &'static str = "CREATE TABLE IF NOT EXISTS partitions (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

    /// Open (or create) a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::Backend(e.to_string()))?;
            }
        }
        let conn = rusqlite::Connection::open(path)?;
        conn.execute_batch(Self::CREATE_TABLE)?;
        tracing::debug!("Opened annotation database at {:?}", path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = rusqlite::Connection::open_in_memory()?;
        conn.execute_batch(Self::CREATE_TABLE)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, rusqlite::Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Backend(format!("Mutex poisoned: {}", e)))
    }
}

#[cfg(feature = "sqlite")]
impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        use rusqlite::OptionalExtension;

        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM partitions WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO partitions (key, value) VALUES (?1, ?2)",
            [key, value],
        )?;
        Ok(())
    }
}
