use rusqlite::{params, Connection, OptionalExtension};

use super::store::KvStore;
use crate::error::{Error, Result};

/// `KvStore` backed by a single SQLite table
pub struct SqliteStore {
    conn: Connection,
}

fn unavailable(context: String) -> impl FnOnce(rusqlite::Error) -> Error {
    move |e| Error::StorageUnavailable(format!("{}: {}", context, e))
}

impl SqliteStore {
    /// Create a new in-memory store
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(unavailable("Failed to create in-memory database".to_string()))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open (or create) a store file
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(unavailable(format!("Failed to open database at {}", path)))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );
                "#,
            )
            .map_err(unavailable("Failed to initialize database schema".to_string()))
    }

    /// Number of stored values
    pub fn entry_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .map_err(unavailable("Failed to count entries".to_string()))?;
        Ok(count as usize)
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(unavailable(format!("Failed to read {}", key)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(unavailable(format!("Failed to write {}", key)))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(unavailable(format!("Failed to delete {}", key)))?;
        Ok(())
    }
}
