//! Slice state shapes and the combined snapshot.
//!
//! # Invariants
//! - Single-value slices are wrapped as `{ "value": ... }` on disk.
//! - Entry ids are unique inside `EntriesSlice::value`.

use crate::model::entry::{now_epoch_ms, Entry};
use crate::model::profile::{Locale, Profile, Theme};
use crate::store::slice::SliceKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntriesSlice {
    #[serde(default)]
    pub value: Vec<Entry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSlice {
    #[serde(default)]
    pub value: Theme,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleSlice {
    #[serde(default)]
    pub value: Locale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSlice {
    pub value: i64,
}

impl Default for DateSlice {
    fn default() -> Self {
        Self {
            value: now_epoch_ms(),
        }
    }
}

/// Combined snapshot of every slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub date: DateSlice,
    pub entries: EntriesSlice,
    pub theme: ThemeSlice,
    pub locale: LocaleSlice,
    pub profile: Profile,
}

impl AppState {
    /// JSON snapshot of one slice, as written to storage.
    pub fn slice_json(&self, key: SliceKey) -> serde_json::Result<Value> {
        match key {
            SliceKey::Date => serde_json::to_value(&self.date),
            SliceKey::Entries => serde_json::to_value(&self.entries),
            SliceKey::Theme => serde_json::to_value(&self.theme),
            SliceKey::Locale => serde_json::to_value(&self.locale),
            SliceKey::Profile => serde_json::to_value(&self.profile),
        }
    }
}
