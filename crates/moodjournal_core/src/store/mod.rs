//! Persisted application-state store.
//!
//! # Responsibility
//! - Hold the single source of truth for journal state, split into slices.
//! - Accept mutations only through dispatched `Action`s.
//! - Rehydrate persisted slices at startup and queue them for durable
//!   write after every applied mutation.
//!
//! # Invariants
//! - A mutation is visible to readers as soon as `dispatch` returns.
//! - Only slices that actually changed are queued for persistence.
//! - Rehydration never fails startup: unreadable slices fall back to
//!   defaults (use `try_rehydrate` to surface those failures instead).
//! - The store is constructed explicitly and owned by its caller; there is
//!   no process-wide instance.

pub mod action;
pub mod query;
pub mod reducer;
pub mod slice;
pub mod state;

use crate::config::StoreConfig;
use crate::model::entry::Entry;
use crate::model::profile::{Locale, Profile, Theme};
use crate::persist::queue::{FlushReport, WriteQueue};
use crate::persist::storage::{KeyValueStorage, StorageError};
use action::Action;
use log::{debug, error, info, warn};
use query::EntryListQuery;
use reducer::{reduce, DispatchOutcome};
use serde::de::DeserializeOwned;
use serde_json::Value;
use slice::SliceKey;
use state::{AppState, LocaleSlice};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
    /// A stored slice payload could not be decoded.
    CorruptSlice {
        key: &'static str,
        source: serde_json::Error,
    },
    Serialize(serde_json::Error),
    /// Some queued writes were not acknowledged by the backend.
    IncompleteFlush { failed_keys: Vec<String> },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::CorruptSlice { key, source } => {
                write!(f, "stored slice `{key}` is corrupted: {source}")
            }
            Self::Serialize(err) => write!(f, "failed to serialize slice: {err}"),
            Self::IncompleteFlush { failed_keys } => {
                write!(f, "flush left writes pending for: {}", failed_keys.join(", "))
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::CorruptSlice { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::IncompleteFlush { .. } => None,
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Slice-based state container over a key-value backend.
pub struct Store<S: KeyValueStorage> {
    state: AppState,
    storage: S,
    queue: WriteQueue,
    config: StoreConfig,
}

impl<S: KeyValueStorage> Store<S> {
    /// Creates a store with default slices, ignoring anything in `storage`.
    pub fn new(storage: S, config: StoreConfig) -> Self {
        let mut state = AppState::default();
        state.locale.value = Locale::new(config.default_locale.clone());
        Self {
            state,
            storage,
            queue: WriteQueue::new(),
            config,
        }
    }

    /// Creates a store and restores every persisted slice from `storage`.
    ///
    /// Missing or unreadable slices are replaced by their defaults; failures
    /// are logged, never returned.
    pub fn rehydrate(storage: S, config: StoreConfig) -> Self {
        let mut store = Self::new(storage, config);
        for key in SliceKey::PERSISTED {
            if let Err(err) = store.restore_slice(key) {
                warn!(
                    "event=store_rehydrate_slice module=store status=fallback slice={} error={}",
                    key.name(),
                    err
                );
            }
        }
        info!(
            "event=store_rehydrate module=store status=ok entries={}",
            store.state.entries.value.len()
        );
        store
    }

    /// Like [`Store::rehydrate`], but fails on the first unreadable slice.
    pub fn try_rehydrate(storage: S, config: StoreConfig) -> StoreResult<Self> {
        let mut store = Self::new(storage, config);
        for key in SliceKey::PERSISTED {
            store.restore_slice(key)?;
        }
        Ok(store)
    }

    /// Applies `action` to its slice and queues the slice for persistence.
    pub fn dispatch(&mut self, action: Action) -> DispatchOutcome {
        let slice = action.slice();
        let name = action.name();
        let outcome = reduce(&mut self.state, action, self.config.duplicate_id_policy);
        debug!(
            "event=store_dispatch module=store action={} slice={} outcome={}",
            name,
            slice.name(),
            outcome.as_str()
        );

        if outcome.is_applied() {
            self.queue_slice(slice);
            if self.config.autoflush {
                // Failures stay queued; `ensure_persisted` reports them.
                self.flush();
            }
        }
        outcome
    }

    /// Writes every queued slice to storage.
    pub fn flush(&mut self) -> FlushReport {
        self.queue.flush(&mut self.storage)
    }

    /// Flushes and converts a partial flush into an error.
    pub fn flush_strict(&mut self) -> StoreResult<FlushReport> {
        let report = self.flush();
        if report.is_complete() {
            return Ok(report);
        }
        Err(StoreError::IncompleteFlush {
            failed_keys: report
                .failed
                .into_iter()
                .map(|failure| failure.key)
                .collect(),
        })
    }

    /// Queues every persisted slice, then flushes.
    pub fn persist_all(&mut self) -> FlushReport {
        for key in SliceKey::PERSISTED {
            self.queue_slice(key);
        }
        self.flush()
    }

    /// Fails when autoflush is on and earlier writes are still queued.
    ///
    /// Queued writes are kept and retried by the next flush.
    pub fn ensure_persisted(&self) -> StoreResult<()> {
        if !self.config.autoflush || self.queue.is_idle() {
            return Ok(());
        }
        Err(StoreError::IncompleteFlush {
            failed_keys: self
                .queue
                .pending()
                .into_iter()
                .map(|write| write.key.clone())
                .collect(),
        })
    }

    /// Deletes all persisted slices from storage and resets in-memory state.
    ///
    /// State is reset even when a delete fails. Slices whose delete failed are
    /// queued with their defaults so the next flush overwrites the stale row.
    pub fn purge(&mut self) -> StoreResult<()> {
        let mut first_error = None;
        let mut leftover = Vec::new();
        for key in SliceKey::PERSISTED {
            let Some(storage_key) = key.storage_key() else {
                continue;
            };
            if let Err(err) = self.storage.remove_item(storage_key) {
                warn!(
                    "event=store_purge_slice module=store status=error slice={} error={}",
                    key.name(),
                    err
                );
                leftover.push(key);
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        // Writes queued before the purge must not resurrect old data.
        self.queue = WriteQueue::new();
        let date = self.state.date.clone();
        self.state = AppState::default();
        self.state.date = date;
        self.state.locale.value = Locale::new(self.config.default_locale.clone());

        for key in leftover {
            self.queue_slice(key);
        }
        match first_error {
            None => {
                info!("event=store_purge module=store status=ok");
                Ok(())
            }
            Some(err) => Err(err.into()),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn entries(&self) -> &[Entry] {
        &self.state.entries.value
    }

    pub fn profile(&self) -> &Profile {
        &self.state.profile
    }

    pub fn theme(&self) -> Theme {
        self.state.theme.value
    }

    pub fn locale(&self) -> &Locale {
        &self.state.locale.value
    }

    /// Selected calendar day, epoch milliseconds.
    pub fn date(&self) -> i64 {
        self.state.date.value
    }

    pub fn find_entry(&self, id: &str) -> Option<&Entry> {
        self.state.entries.value.iter().find(|entry| entry.id == id)
    }

    /// Entry by id, or an empty placeholder when it does not exist.
    pub fn entry_or_default(&self, id: &str) -> Entry {
        self.find_entry(id).cloned().unwrap_or_else(Entry::placeholder)
    }

    pub fn list_entries(&self, query: &EntryListQuery) -> Vec<&Entry> {
        query.apply(&self.state.entries.value)
    }

    /// Reads state by dotted path, e.g. `entries`, `profile.wallet`,
    /// `entries.value.0.content`.
    ///
    /// Returns `None` for unknown slices or paths.
    pub fn select(&self, path: &str) -> Option<Value> {
        let mut segments = path.split('.').filter(|segment| !segment.is_empty());
        let key = SliceKey::from_name(segments.next()?)?;
        let mut current = self.state.slice_json(key).ok()?;
        for segment in segments {
            current = match current {
                Value::Object(mut map) => map.remove(segment)?,
                Value::Array(mut items) => {
                    let index = segment.parse::<usize>().ok()?;
                    if index >= items.len() {
                        return None;
                    }
                    items.swap_remove(index)
                }
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn queue(&self) -> &WriteQueue {
        &self.queue
    }

    pub fn pending_writes(&self) -> usize {
        self.queue.pending_len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_idle()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Direct backend access; bypasses the queue, so state may diverge.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Releases the backend. Writes still queued are dropped.
    pub fn into_storage(self) -> S {
        if !self.queue.is_idle() {
            warn!(
                "event=store_close module=store status=lossy pending={}",
                self.queue.pending_len()
            );
        }
        self.storage
    }

    fn queue_slice(&mut self, key: SliceKey) {
        let Some(storage_key) = key.storage_key() else {
            return;
        };
        match self.state.slice_json(key).and_then(|value| serde_json::to_string(&value)) {
            Ok(payload) => {
                self.queue.enqueue(storage_key, payload);
            }
            Err(err) => {
                error!(
                    "event=store_queue module=store status=error slice={} error={}",
                    key.name(),
                    err
                );
            }
        }
    }

    fn restore_slice(&mut self, key: SliceKey) -> StoreResult<()> {
        match key {
            SliceKey::Entries => {
                if let Some(mut slice) = self.load::<state::EntriesSlice>(key)? {
                    dedupe_entries(&mut slice.value);
                    self.state.entries = slice;
                }
            }
            SliceKey::Theme => {
                if let Some(slice) = self.load(key)? {
                    self.state.theme = slice;
                }
            }
            SliceKey::Locale => {
                if let Some(slice) = self.load::<LocaleSlice>(key)? {
                    self.state.locale = slice;
                }
            }
            SliceKey::Profile => {
                if let Some(profile) = self.load(key)? {
                    self.state.profile = profile;
                }
            }
            SliceKey::Date => {}
        }
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: SliceKey) -> StoreResult<Option<T>> {
        let Some(storage_key) = key.storage_key() else {
            return Ok(None);
        };
        let Some(payload) = self.storage.get_item(storage_key)? else {
            return Ok(None);
        };
        serde_json::from_str(&payload)
            .map(Some)
            .map_err(|source| StoreError::CorruptSlice {
                key: storage_key,
                source,
            })
    }
}

/// Drops later entries whose id already appeared, keeping the first.
fn dedupe_entries(entries: &mut Vec<Entry>) {
    let mut seen = HashSet::new();
    let before = entries.len();
    entries.retain(|entry| seen.insert(entry.id.clone()));
    if entries.len() != before {
        warn!(
            "event=store_rehydrate_dedupe module=store status=fixed dropped={}",
            before - entries.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use crate::config::StoreConfig;
    use crate::model::entry::Entry;
    use crate::persist::storage::MemoryStorage;
    use crate::store::action::Action;
    use serde_json::json;

    fn store() -> Store<MemoryStorage> {
        Store::new(MemoryStorage::new(), StoreConfig::default())
    }

    #[test]
    fn select_walks_objects_and_arrays() {
        let mut store = store();
        store.dispatch(Action::AddEntry(Entry::with_id("1", "hello", 5)));
        store.dispatch(Action::SetWallet("0xabc".to_string()));

        assert_eq!(store.select("profile.wallet"), Some(json!("0xabc")));
        assert_eq!(
            store.select("entries.value.0.content"),
            Some(json!("hello"))
        );
        assert_eq!(store.select("entries.value.3"), None);
        assert_eq!(store.select("settings"), None);
    }

    #[test]
    fn session_only_date_is_never_queued() {
        let config = StoreConfig {
            autoflush: false,
            ..StoreConfig::default()
        };
        let mut store = Store::new(MemoryStorage::new(), config);
        store.dispatch(Action::SetDate(42));
        assert_eq!(store.date(), 42);
        assert!(store.is_idle());
    }

    #[test]
    fn default_locale_comes_from_config() {
        let config = StoreConfig {
            default_locale: "de".to_string(),
            ..StoreConfig::default()
        };
        let store = Store::new(MemoryStorage::new(), config);
        assert_eq!(store.locale().as_str(), "de");
    }

    #[test]
    fn missing_entry_degrades_to_placeholder() {
        let store = store();
        let entry = store.entry_or_default("missing");
        assert!(entry.id.is_empty());
        assert!(entry.content.is_empty());
        assert!(entry.images_url.is_empty());
    }
}
