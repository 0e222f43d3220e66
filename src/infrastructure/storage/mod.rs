//! Key-value store implementations
//!
//! `SqliteStore` is the durable store the bot runs against; `MemoryStore`
//! backs development and deterministic tests. Both are reached only through
//! the `KvStore` trait.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use tokio::sync::{Mutex, RwLock};

use crate::application::errors::StoreError;
use crate::domain::traits::KvStore;

fn db_err(e: rusqlite::Error) -> StoreError {
    match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::DatabaseBusy =>
        {
            StoreError::Timeout
        }
        other => StoreError::Database(other.to_string()),
    }
}

/// SQLite-backed store: one `kv` table, one shared connection. The connection
/// lock makes every operation, `increment` included, atomic with respect to
/// concurrent callers.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(db_err)?;
        Self::init_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private throwaway database, for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::init_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_tables(conn: &Connection) -> Result<(), StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(db_err)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            [key, value],
        )
        .map_err(db_err)?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().await;
        let rows = conn
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .map_err(db_err)?;
        Ok(rows > 0)
    }

    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(db_err)?;

        let current: Option<String> = tx
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(db_err)?;

        let next = match current {
            Some(value) => {
                value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| StoreError::NotCounter(key.to_string()))?
                    + 1
            }
            None => 1,
        };

        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            [key, next.to_string().as_str()],
        )
        .map_err(db_err)?;
        tx.commit().map_err(db_err)?;

        Ok(next)
    }
}

/// In-memory store for development and tests.
#[derive(Default)]
pub struct MemoryStore {
    kv: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let kv = self.kv.read().await;
        Ok(kv.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut kv = self.kv.write().await;
        kv.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let kv = self.kv.read().await;
        Ok(kv.contains_key(key))
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut kv = self.kv.write().await;
        Ok(kv.remove(key).is_some())
    }

    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        // The write lock spans read-parse-write, keeping the counter atomic.
        let mut kv = self.kv.write().await;
        let next = match kv.get(key) {
            Some(value) => {
                value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| StoreError::NotCounter(key.to_string()))?
                    + 1
            }
            None => 1,
        };
        kv.insert(key.to_string(), next.to_string());
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn exercise_store(store: &dyn KvStore) {
        // Absence is a normal outcome.
        assert_eq!(store.get("missing").await.expect("get"), None);
        assert!(!store.exists("missing").await.expect("exists"));
        assert!(!store.delete("missing").await.expect("delete"));

        // Set overwrites unconditionally.
        store.set("color", "red").await.expect("set");
        store.set("color", "blue").await.expect("set again");
        assert_eq!(
            store.get("color").await.expect("get"),
            Some("blue".to_string())
        );
        assert!(store.exists("color").await.expect("exists"));

        // Delete reports presence, once.
        assert!(store.delete("color").await.expect("delete"));
        assert!(!store.delete("color").await.expect("second delete"));

        // Increment initializes at zero and counts up.
        assert_eq!(store.increment("hits").await.expect("first"), 1);
        assert_eq!(store.increment("hits").await.expect("second"), 2);
        assert_eq!(
            store.get("hits").await.expect("get"),
            Some("2".to_string())
        );

        // Increment picks up an integer-parsable stored value.
        store.set("laps", "41").await.expect("set");
        assert_eq!(store.increment("laps").await.expect("increment"), 42);

        // A non-integer value is a store error, and stays untouched.
        store.set("pet", "turtle").await.expect("set");
        let err = store.increment("pet").await.expect_err("must fail");
        assert!(matches!(err, StoreError::NotCounter(key) if key == "pet"));
        assert_eq!(
            store.get("pet").await.expect("get"),
            Some("turtle".to_string())
        );
    }

    #[tokio::test]
    async fn memory_store_contract() {
        let store = MemoryStore::new();
        exercise_store(&store).await;
    }

    #[tokio::test]
    async fn sqlite_store_contract() {
        let store = SqliteStore::open_in_memory().expect("open");
        exercise_store(&store).await;
    }

    #[tokio::test]
    async fn sqlite_concurrent_increments_are_not_lost() {
        use std::sync::Arc;

        let store = Arc::new(SqliteStore::open_in_memory().expect("open"));
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(
                async move { store.increment("shared").await },
            ));
        }
        for handle in handles {
            handle.await.expect("join").expect("increment");
        }
        assert_eq!(
            store.get("shared").await.expect("get"),
            Some("16".to_string())
        );
    }
}
