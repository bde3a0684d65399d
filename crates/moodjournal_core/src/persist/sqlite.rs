//! SQLite-backed key-value storage.
//!
//! # Responsibility
//! - Persist slice payloads in the `kv_store` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - The wrapped connection has migrations applied before first use.
//! - `set_item` is an upsert; one row per key.

use crate::db::{open_db, open_db_in_memory};
use crate::persist::storage::{KeyValueStorage, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Key-value storage over one owned SQLite connection.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the storage file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps a connection that already went through `open_db`.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteStorage;
    use crate::db::open_db_in_memory;
    use crate::persist::storage::KeyValueStorage;

    #[test]
    fn upsert_keeps_one_row_per_key() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage.set_item("persist:locale", "\"en\"").unwrap();
        storage.set_item("persist:locale", "\"fr\"").unwrap();

        let rows: i64 = storage
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(
            storage.get_item("persist:locale").unwrap().as_deref(),
            Some("\"fr\"")
        );
    }

    #[test]
    fn missing_key_reads_as_none() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.get_item("persist:entries").unwrap().is_none());
    }

    #[test]
    fn wrapped_connection_round_trips_through_storage() {
        let mut storage = SqliteStorage::from_connection(open_db_in_memory().unwrap());
        storage.set_item("persist:theme", "{\"value\":\"dark\"}").unwrap();
        storage.remove_item("persist:missing").unwrap();

        let conn = storage.into_connection();
        let value: String = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                ["persist:theme"],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(value, "{\"value\":\"dark\"}");
    }
}
