//! Journal entry use-case service.
//!
//! # Responsibility
//! - Turn create/edit/view/pin/delete flows into store actions.
//! - Validate input at the boundary (non-empty content, tags, storage).
//! - Derive list previews for entry summaries.
//!
//! # Invariants
//! - Content is trimmed and must be non-empty before it reaches the store.
//! - Tags are trimmed, lowercased and deduplicated.
//! - Only `EntryStorage::Local` entries are accepted.

use crate::model::entry::{
    normalize_tag, Entry, EntryId, EntryStorage, EntryValidationError, Mood,
};
use crate::persist::storage::KeyValueStorage;
use crate::store::action::Action;
use crate::store::query::EntryListQuery;
use crate::store::reducer::DispatchOutcome;
use crate::store::{Store, StoreError};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PREVIEW_MAX_CHARS: usize = 100;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Service error for journal use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalServiceError {
    EmptyId,
    EmptyContent,
    /// Tag input contains a blank value.
    InvalidTag(String),
    EntryNotFound(EntryId),
    /// Requested storage target has no working backend.
    UnsupportedStorage(EntryStorage),
    ImageIndexOutOfRange { index: usize, len: usize },
    DuplicateEntry(EntryId),
    EmptyImageUri,
    /// State changed in memory but the listed slice writes did not reach
    /// storage; they stay queued for the next flush.
    Store { failed_keys: Vec<String> },
}

impl Display for JournalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "entry id cannot be empty"),
            Self::EmptyContent => write!(f, "entry content cannot be empty"),
            Self::InvalidTag(value) => write!(f, "invalid tag: `{value}`"),
            Self::EntryNotFound(id) => write!(f, "entry not found: {id}"),
            Self::UnsupportedStorage(storage) => {
                write!(f, "storage target {storage:?} is not supported")
            }
            Self::ImageIndexOutOfRange { index, len } => {
                write!(f, "image index {index} out of range for {len} image(s)")
            }
            Self::DuplicateEntry(id) => write!(f, "entry already exists: {id}"),
            Self::EmptyImageUri => write!(f, "image uri cannot be empty"),
            Self::Store { failed_keys } => {
                write!(
                    f,
                    "change kept in memory only, writes pending for: {}",
                    failed_keys.join(", ")
                )
            }
        }
    }
}

impl Error for JournalServiceError {}

impl From<EntryValidationError> for JournalServiceError {
    fn from(value: EntryValidationError) -> Self {
        match value {
            EntryValidationError::EmptyContent => Self::EmptyContent,
            EntryValidationError::EmptyId => Self::EmptyId,
        }
    }
}

pub type JournalResult<T> = Result<T, JournalServiceError>;

/// Input for a new entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub content: String,
    pub mood: Option<Mood>,
    pub images_url: Vec<String>,
    pub tags: Vec<String>,
    pub storage: EntryStorage,
}

/// Partial edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryEdit {
    pub content: Option<String>,
    pub mood: Option<Mood>,
    pub images_url: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub storage: Option<EntryStorage>,
}

/// List projection of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub id: EntryId,
    pub preview: Option<String>,
    pub mood: Mood,
    pub is_pinned: bool,
    pub date: i64,
    pub image_count: usize,
    /// First attached image, used as thumbnail.
    pub cover_image: Option<String>,
}

/// Journal facade over an injected store.
pub struct JournalService<'s, S: KeyValueStorage> {
    store: &'s mut Store<S>,
}

impl<'s, S: KeyValueStorage> JournalService<'s, S> {
    pub fn new(store: &'s mut Store<S>) -> Self {
        Self { store }
    }

    /// Creates one entry with a generated id and the current time.
    pub fn create_entry(&mut self, draft: EntryDraft) -> JournalResult<Entry> {
        let content = normalize_content(&draft.content)?;
        ensure_supported_storage(draft.storage)?;

        let mut entry = Entry::new(content);
        entry.mood = draft.mood;
        entry.images_url = normalize_images(draft.images_url);
        entry.tags = normalize_tags(&draft.tags)?;
        entry.storage = draft.storage;

        self.insert(entry)
    }

    /// Adds an entry that already carries its identity (imports, restores).
    pub fn import_entry(&mut self, mut entry: Entry) -> JournalResult<Entry> {
        entry.content = normalize_content(&entry.content)?;
        entry.validate()?;
        ensure_supported_storage(entry.storage)?;
        let tags = entry.tags.iter().cloned().collect::<Vec<_>>();
        entry.tags = normalize_tags(&tags)?;
        self.insert(entry)
    }

    /// Merges `edit` into the stored entry.
    ///
    /// `id`, `date` and `is_pinned` are never changed by an edit.
    pub fn edit_entry(&mut self, id: &str, edit: EntryEdit) -> JournalResult<Entry> {
        let mut entry = self.require(id)?.clone();
        if let Some(content) = edit.content {
            entry.content = normalize_content(&content)?;
        }
        if let Some(storage) = edit.storage {
            ensure_supported_storage(storage)?;
            entry.storage = storage;
        }
        if let Some(tags) = edit.tags {
            entry.tags = normalize_tags(&tags)?;
        }
        if let Some(images) = edit.images_url {
            entry.images_url = normalize_images(images);
        }
        if edit.mood.is_some() {
            entry.mood = edit.mood;
        }

        self.store.dispatch(Action::UpdateEntry(entry));
        self.ensure_persisted()?;
        self.read_back(id)
    }

    /// Flips the favorite flag and returns the updated entry.
    pub fn toggle_pin(&mut self, id: &str) -> JournalResult<Entry> {
        let mut entry = self.require(id)?.clone();
        entry.is_pinned = !entry.is_pinned;
        self.store.dispatch(Action::UpdateEntry(entry));
        self.ensure_persisted()?;
        self.read_back(id)
    }

    /// Appends one image URI returned by the picker.
    pub fn add_image(&mut self, id: &str, uri: &str) -> JournalResult<Entry> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(JournalServiceError::EmptyImageUri);
        }
        let mut entry = self.require(id)?.clone();
        entry.images_url.push(uri.to_string());
        self.store.dispatch(Action::UpdateEntry(entry));
        self.ensure_persisted()?;
        self.read_back(id)
    }

    pub fn remove_image(&mut self, id: &str, index: usize) -> JournalResult<Entry> {
        let mut entry = self.require(id)?.clone();
        let len = entry.images_url.len();
        if index >= len {
            return Err(JournalServiceError::ImageIndexOutOfRange { index, len });
        }
        entry.images_url.remove(index);
        self.store.dispatch(Action::UpdateEntry(entry));
        self.ensure_persisted()?;
        self.read_back(id)
    }

    pub fn remove_entry(&mut self, id: &str) -> JournalResult<()> {
        match self.store.dispatch(Action::RemoveEntry(id.to_string())) {
            DispatchOutcome::Applied => {
                self.ensure_persisted()?;
                info!("event=entry_remove module=service status=ok");
                Ok(())
            }
            _ => Err(JournalServiceError::EntryNotFound(id.to_string())),
        }
    }

    pub fn get_entry(&self, id: &str) -> Option<&Entry> {
        self.store.find_entry(id)
    }

    /// Entry for view/edit screens; missing ids yield an empty placeholder.
    pub fn view_entry(&self, id: &str) -> Entry {
        self.store.entry_or_default(id)
    }

    pub fn list_entries(&self, query: &EntryListQuery) -> Vec<&Entry> {
        self.store.list_entries(query)
    }

    pub fn list_summaries(&self, query: &EntryListQuery) -> Vec<EntrySummary> {
        self.store
            .list_entries(query)
            .into_iter()
            .map(summarize)
            .collect()
    }

    /// All tags in use, sorted.
    pub fn list_tags(&self) -> Vec<String> {
        self.store
            .entries()
            .iter()
            .flat_map(|entry| entry.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn insert(&mut self, entry: Entry) -> JournalResult<Entry> {
        let id = entry.id.clone();
        match self.store.dispatch(Action::AddEntry(entry)) {
            DispatchOutcome::Rejected => Err(JournalServiceError::DuplicateEntry(id)),
            _ => {
                self.ensure_persisted()?;
                info!("event=entry_create module=service status=ok");
                self.read_back(&id)
            }
        }
    }

    fn ensure_persisted(&self) -> JournalResult<()> {
        if let Err(StoreError::IncompleteFlush { failed_keys }) = self.store.ensure_persisted() {
            warn!(
                "event=entry_persist module=service status=pending keys={}",
                failed_keys.join(",")
            );
            return Err(JournalServiceError::Store { failed_keys });
        }
        Ok(())
    }

    fn require(&self, id: &str) -> JournalResult<&Entry> {
        self.store
            .find_entry(id)
            .ok_or_else(|| JournalServiceError::EntryNotFound(id.to_string()))
    }

    fn read_back(&self, id: &str) -> JournalResult<Entry> {
        self.require(id).cloned()
    }
}

/// Collapses whitespace and keeps the first 100 characters.
pub fn derive_entry_preview(content: &str) -> Option<String> {
    let normalized = WHITESPACE_RE.replace_all(content, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
}

fn normalize_tags(tags: &[String]) -> JournalResult<BTreeSet<String>> {
    tags.iter()
        .map(|tag| normalize_tag(tag).ok_or_else(|| JournalServiceError::InvalidTag(tag.clone())))
        .collect()
}

fn normalize_content(content: &str) -> JournalResult<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(JournalServiceError::EmptyContent);
    }
    Ok(trimmed.to_string())
}

fn normalize_images(images: Vec<String>) -> Vec<String> {
    images
        .into_iter()
        .map(|uri| uri.trim().to_string())
        .filter(|uri| !uri.is_empty())
        .collect()
}

fn ensure_supported_storage(storage: EntryStorage) -> JournalResult<()> {
    match storage {
        EntryStorage::Local => Ok(()),
        other => Err(JournalServiceError::UnsupportedStorage(other)),
    }
}

fn summarize(entry: &Entry) -> EntrySummary {
    EntrySummary {
        id: entry.id.clone(),
        preview: derive_entry_preview(&entry.content),
        mood: entry.effective_mood(),
        is_pinned: entry.is_pinned,
        date: entry.date,
        image_count: entry.images_url.len(),
        cover_image: entry.images_url.first().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::derive_entry_preview;

    #[test]
    fn preview_collapses_whitespace_and_limits_length() {
        let source = format!("line one\n\n\tline   two {}", "x".repeat(200));
        let preview = derive_entry_preview(&source).expect("preview should exist");
        assert!(preview.starts_with("line one line two"));
        assert_eq!(preview.chars().count(), 100);
        assert_eq!(derive_entry_preview(" \n "), None);
    }
}
