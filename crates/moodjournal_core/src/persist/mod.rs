//! Slice persistence: storage backends and the durable write queue.
//!
//! # Responsibility
//! - Define the key-value contract slices are persisted through.
//! - Provide SQLite and in-memory backends.
//! - Queue slice writes until the backend acknowledges them.
//!
//! # Invariants
//! - Each persisted slice lives under its own key.
//! - Payloads are JSON snapshots without a version field.

pub mod queue;
pub mod sqlite;
pub mod storage;

pub use queue::{FlushFailure, FlushReport, PendingWrite, WriteQueue};
pub use sqlite::SqliteStorage;
pub use storage::{KeyValueStorage, MemoryStorage, StorageError, StorageResult};
