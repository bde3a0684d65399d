//! Key-value storage contract and in-memory implementation.
//!
//! # Responsibility
//! - Define the minimal string key-value API slices are persisted through.
//! - Provide an in-memory backend for tests and ephemeral sessions.
//!
//! # Invariants
//! - `set_item` replaces any previous value stored under the same key.
//! - `remove_item` on a missing key succeeds.

use crate::db::DbError;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Backend failure for one storage operation.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Backend refused the operation for a non-database reason.
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string key-value store, one value per slice key.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&mut self, key: &str) -> StorageResult<()>;
}

/// Process-local storage backed by a sorted map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStorage, MemoryStorage};

    #[test]
    fn set_replaces_and_remove_is_idempotent() {
        let mut storage = MemoryStorage::new();
        storage.set_item("persist:theme", "1").unwrap();
        storage.set_item("persist:theme", "2").unwrap();
        assert_eq!(
            storage.get_item("persist:theme").unwrap().as_deref(),
            Some("2")
        );

        storage.remove_item("persist:theme").unwrap();
        storage.remove_item("persist:theme").unwrap();
        assert!(storage.get_item("persist:theme").unwrap().is_none());
        assert!(storage.is_empty());
    }
}
