//! Core domain logic for the mood journal.
//! This crate owns the persisted state store and every journal invariant.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;

pub use config::{ConfigError, DuplicateIdPolicy, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{
    normalize_tag, Entry, EntryId, EntryStorage, EntryValidationError, Mood,
};
pub use model::profile::{Locale, Profile, Theme};
pub use persist::{
    FlushReport, KeyValueStorage, MemoryStorage, SqliteStorage, StorageError, StorageResult,
    WriteQueue,
};
pub use service::journal_service::{
    EntryDraft, EntryEdit, EntrySummary, JournalService, JournalServiceError,
};
pub use service::profile_service::{shorten_wallet, ProfileService, ProfileServiceError};
pub use store::action::Action;
pub use store::query::{EntryListQuery, EntrySort};
pub use store::reducer::DispatchOutcome;
pub use store::slice::SliceKey;
pub use store::{Store, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
