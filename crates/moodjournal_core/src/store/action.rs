//! Update actions accepted by the store.

use crate::model::entry::{Entry, EntryId};
use crate::model::profile::{Locale, Theme};
use crate::store::slice::SliceKey;

/// Named, side-effect free update of exactly one slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddEntry(Entry),
    UpdateEntry(Entry),
    RemoveEntry(EntryId),
    SetName(String),
    SetEmail(String),
    SetWallet(String),
    SetTheme(Theme),
    SetLocale(Locale),
    /// Selected calendar day, epoch milliseconds.
    SetDate(i64),
}

impl Action {
    /// Stable action name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddEntry(_) => "add_entry",
            Self::UpdateEntry(_) => "update_entry",
            Self::RemoveEntry(_) => "remove_entry",
            Self::SetName(_) => "set_name",
            Self::SetEmail(_) => "set_email",
            Self::SetWallet(_) => "set_wallet",
            Self::SetTheme(_) => "set_theme",
            Self::SetLocale(_) => "set_locale",
            Self::SetDate(_) => "set_date",
        }
    }

    /// The slice this action mutates.
    pub fn slice(&self) -> SliceKey {
        match self {
            Self::AddEntry(_) | Self::UpdateEntry(_) | Self::RemoveEntry(_) => SliceKey::Entries,
            Self::SetName(_) | Self::SetEmail(_) | Self::SetWallet(_) => SliceKey::Profile,
            Self::SetTheme(_) => SliceKey::Theme,
            Self::SetLocale(_) => SliceKey::Locale,
            Self::SetDate(_) => SliceKey::Date,
        }
    }
}
