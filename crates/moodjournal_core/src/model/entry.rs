//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the canonical journal record persisted in the `entries` slice.
//! - Define the fixed mood and storage-target enumerations.
//!
//! # Invariants
//! - `id` is stable and never reused for another entry.
//! - `date` is set once at creation and never rewritten by updates.
//! - `content` must be non-empty (after trim) for an entry to be valid.
//!
//! # See also
//! - crate::store::reducer for the mutation rules.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

static TAG_WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid tag whitespace regex"));

/// Stable identifier of one journal entry.
///
/// Kept as a string alias: imported entries may carry ids that are not UUIDs.
pub type EntryId = String;

/// Fixed mood categories, serialized by numeric value.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Mood {
    Happy = 0,
    /// Baseline category used when an entry carries no mood.
    #[default]
    Neutral = 1,
    Sad = 2,
    Angry = 3,
    Anxious = 4,
    Tired = 5,
}

impl Mood {
    /// All moods in display order.
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Neutral,
        Mood::Sad,
        Mood::Angry,
        Mood::Anxious,
        Mood::Tired,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Anxious => "anxious",
            Self::Tired => "tired",
        }
    }
}

impl From<Mood> for u8 {
    fn from(value: Mood) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for Mood {
    type Error = InvalidDiscriminant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Mood::ALL
            .into_iter()
            .find(|mood| *mood as u8 == value)
            .ok_or(InvalidDiscriminant {
                kind: "mood",
                value,
            })
    }
}

/// Intended persistence target of an entry.
///
/// Only `Local` is backed by a working storage path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EntryStorage {
    #[default]
    Local = 0,
    Blockchain = 1,
}

impl From<EntryStorage> for u8 {
    fn from(value: EntryStorage) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for EntryStorage {
    type Error = InvalidDiscriminant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Local),
            1 => Ok(Self::Blockchain),
            other => Err(InvalidDiscriminant {
                kind: "storage",
                value: other,
            }),
        }
    }
}

/// Numeric enum value outside the known range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDiscriminant {
    kind: &'static str,
    value: u8,
}

impl Display for InvalidDiscriminant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} value `{}`", self.kind, self.value)
    }
}

impl Error for InvalidDiscriminant {}

/// Validation failures for [`Entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyId,
    EmptyContent,
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "entry id cannot be empty"),
            Self::EmptyContent => write!(f, "entry content cannot be empty"),
        }
    }
}

impl Error for EntryValidationError {}

/// One user-authored journal record.
///
/// Field names are serialized in camelCase to keep the on-device payload
/// shape of the `entries` slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub content: String,
    /// Local image URIs in the order they were attached.
    #[serde(default)]
    pub images_url: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub is_pinned: bool,
    /// Creation time, Unix epoch milliseconds.
    pub date: i64,
    #[serde(default)]
    pub storage: EntryStorage,
}

impl Entry {
    /// Creates a new entry with a generated id and the current time.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), content, now_epoch_ms())
    }

    /// Creates an entry with caller-provided identity and creation time.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: impl Into<EntryId>, content: impl Into<String>, date: i64) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            images_url: Vec::new(),
            mood: None,
            tags: BTreeSet::new(),
            is_pinned: false,
            date,
            storage: EntryStorage::Local,
        }
    }

    /// Empty stand-in returned when a lookup misses.
    pub fn placeholder() -> Self {
        Self::with_id(String::new(), String::new(), now_epoch_ms())
    }

    /// Mood with the baseline fallback applied.
    pub fn effective_mood(&self) -> Mood {
        self.mood.unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.id.trim().is_empty() {
            return Err(EntryValidationError::EmptyId);
        }
        if self.content.trim().is_empty() {
            return Err(EntryValidationError::EmptyContent);
        }
        Ok(())
    }
}

/// Canonical tag form: trimmed, inner whitespace collapsed, lowercase.
///
/// Returns `None` for blank input.
pub fn normalize_tag(value: &str) -> Option<String> {
    let collapsed = TAG_WHITESPACE_RE.replace_all(value.trim(), " ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.to_lowercase())
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{normalize_tag, Entry, EntryStorage, EntryValidationError, Mood};

    #[test]
    fn tags_normalize_to_lowercase() {
        assert_eq!(normalize_tag("  Deep   Work "), Some("deep work".to_string()));
        assert_eq!(normalize_tag("\tdeep\nwork"), Some("deep work".to_string()));
        assert_eq!(normalize_tag("   "), None);
    }

    #[test]
    fn mood_serializes_as_number_and_rejects_unknown_values() {
        assert_eq!(serde_json::to_string(&Mood::Sad).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Mood>("0").unwrap(), Mood::Happy);
        assert!(serde_json::from_str::<Mood>("42").is_err());
    }

    #[test]
    fn missing_mood_falls_back_to_baseline() {
        let entry = Entry::with_id("1", "hello", 0);
        assert_eq!(entry.effective_mood(), Mood::Neutral);
    }

    #[test]
    fn minimal_payload_decodes_with_defaults() {
        let entry: Entry =
            serde_json::from_str(r#"{"id":"1","content":"hello","date":1000}"#).unwrap();
        assert!(entry.images_url.is_empty());
        assert!(entry.tags.is_empty());
        assert!(!entry.is_pinned);
        assert_eq!(entry.storage, EntryStorage::Local);
    }

    #[test]
    fn payload_uses_camel_case_field_names() {
        let mut entry = Entry::with_id("1", "hello", 0);
        entry.is_pinned = true;
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["isPinned"], true);
        assert!(json.get("imagesUrl").is_some());
    }

    #[test]
    fn validate_rejects_blank_content() {
        let entry = Entry::with_id("1", "   ", 0);
        assert_eq!(entry.validate(), Err(EntryValidationError::EmptyContent));
    }

    #[test]
    fn new_entries_get_distinct_ids() {
        assert_ne!(Entry::new("a").id, Entry::new("b").id);
    }
}
