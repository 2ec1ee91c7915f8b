//! Key-value persistence for palette history.
//!
//! History is a single serialized value under one key, so any store that can
//! get and set strings works. The CLI uses SQLite; tests use memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, instrument, trace};

use crate::error::{Result, WssError};

/// String key-value storage.
pub trait KeyValueStore {
    /// Fetch the value under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Returns true if it existed.
    fn remove(&mut self, key: &str) -> Result<bool>;
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}

/// SQLite schema for the key-value table.
const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates a store at the given path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                WssError::Store(format!("Failed to create directory {}: {e}", parent.display()))
            })?;
        }

        debug!(path = %path.display(), "Opening store");
        let conn = Connection::open(path)
            .map_err(|e| WssError::Store(format!("Failed to open database: {e}")))?;

        let store = Self { conn };
        store.init_schema()?;
        info!(path = %path.display(), "Store ready");
        Ok(store)
    }

    /// Creates an in-memory store.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| WssError::Store(format!("Failed to create in-memory database: {e}")))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA_SQL)
            .map_err(|e| WssError::Store(format!("Failed to initialize schema: {e}")))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()
            .map_err(|e| WssError::Store(format!("Failed to read '{key}': {e}")))?;
        trace!(key, found = value.is_some(), "Store get");
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .map_err(|e| WssError::Store(format!("Failed to write '{key}': {e}")))?;
        trace!(key, bytes = value.len(), "Store set");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|e| WssError::Store(format!("Failed to delete '{key}': {e}")))?;
        Ok(rows > 0)
    }
}

/// Returns the default store path.
pub fn default_store_path() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| WssError::Store("Could not determine local data directory".to_string()))?;
    Ok(data_dir.join("wss").join("history.db"))
}
