//! Key-value persistence used by the journal and the model catalog.
//!
//! Callers treat the store as opaque: a string value per string key. Read and
//! write failures are reported as errors here; the consumers decide to fall
//! back to defaults.

use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// A persistent string-to-string store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// [`KeyValueStore`] backed by the SQLite `kv_store` table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-initialized connection (schema and migrations applied).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open the database at `path` and wrap it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(super::open_database(path)?))
    }

    /// Run `f` against the underlying connection.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow!("db lock poisoned: {e}"))?;
        f(&conn)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
            tracing::debug!(key, bytes = value.len(), "stored value");
            Ok(())
        })
    }
}

/// Process-local [`KeyValueStore`]; nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| anyhow!("store lock poisoned: {e}"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| anyhow!("store lock poisoned: {e}"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_store() -> SqliteStore {
        SqliteStore::new(crate::db::open_memory_database().unwrap())
    }

    #[test]
    fn missing_key_is_none() {
        let store = sqlite_store();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn set_then_get() {
        let store = sqlite_store();
        store.set("selected_model", "qwen3:1.7b").unwrap();
        assert_eq!(
            store.get("selected_model").unwrap().as_deref(),
            Some("qwen3:1.7b")
        );
    }

    #[test]
    fn set_overwrites_and_stamps_updated_at() {
        let store = sqlite_store();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

        let (count, updated_at): (i64, Option<String>) = store
            .with_connection(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*), MAX(updated_at) FROM kv_store WHERE key = 'k'",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?)
            })
            .unwrap();
        assert_eq!(count, 1);
        assert!(updated_at.is_some());
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
