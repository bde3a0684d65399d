//! Per-slice reducers.
//!
//! # Responsibility
//! - Apply one `Action` to the slice it targets.
//! - Report whether the slice actually changed.
//!
//! # Invariants
//! - Reducers touch exactly one slice and perform no I/O.
//! - `UpdateEntry` never rewrites the stored `id` or `date`.
//! - Entry ids stay unique after every reduction.

use crate::config::DuplicateIdPolicy;
use crate::model::entry::Entry;
use crate::model::profile::Profile;
use crate::store::action::Action;
use crate::store::state::{AppState, EntriesSlice};

/// Result of dispatching one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The target slice changed.
    Applied,
    /// The action matched nothing or wrote an identical value.
    Unchanged,
    /// The action conflicts with a slice invariant and was dropped.
    Rejected,
}

impl DispatchOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Unchanged => "unchanged",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Routes `action` to its slice reducer.
pub fn reduce(state: &mut AppState, action: Action, policy: DuplicateIdPolicy) -> DispatchOutcome {
    match action {
        Action::AddEntry(entry) => add_entry(&mut state.entries, entry, policy),
        Action::UpdateEntry(entry) => update_entry(&mut state.entries, entry),
        Action::RemoveEntry(id) => remove_entry(&mut state.entries, &id),
        Action::SetName(name) => set_profile_field(&mut state.profile, ProfileField::Name, name),
        Action::SetEmail(email) => {
            set_profile_field(&mut state.profile, ProfileField::Email, email)
        }
        Action::SetWallet(wallet) => {
            set_profile_field(&mut state.profile, ProfileField::Wallet, wallet)
        }
        Action::SetTheme(theme) => replace(&mut state.theme.value, theme),
        Action::SetLocale(locale) => replace(&mut state.locale.value, locale),
        Action::SetDate(date) => replace(&mut state.date.value, date),
    }
}

fn add_entry(slice: &mut EntriesSlice, entry: Entry, policy: DuplicateIdPolicy) -> DispatchOutcome {
    match slice.value.iter().position(|stored| stored.id == entry.id) {
        None => {
            slice.value.push(entry);
            DispatchOutcome::Applied
        }
        Some(index) => match policy {
            DuplicateIdPolicy::Reject => DispatchOutcome::Rejected,
            DuplicateIdPolicy::Overwrite => replace(&mut slice.value[index], entry),
        },
    }
}

fn update_entry(slice: &mut EntriesSlice, mut entry: Entry) -> DispatchOutcome {
    let Some(stored) = slice.value.iter_mut().find(|stored| stored.id == entry.id) else {
        return DispatchOutcome::Unchanged;
    };
    entry.date = stored.date;
    replace(stored, entry)
}

fn remove_entry(slice: &mut EntriesSlice, id: &str) -> DispatchOutcome {
    let before = slice.value.len();
    slice.value.retain(|entry| entry.id != id);
    if slice.value.len() == before {
        DispatchOutcome::Unchanged
    } else {
        DispatchOutcome::Applied
    }
}

#[derive(Debug, Clone, Copy)]
enum ProfileField {
    Name,
    Email,
    Wallet,
}

fn set_profile_field(profile: &mut Profile, field: ProfileField, value: String) -> DispatchOutcome {
    let target = match field {
        ProfileField::Name => &mut profile.name,
        ProfileField::Email => &mut profile.email,
        ProfileField::Wallet => &mut profile.wallet,
    };
    replace(target, value)
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> DispatchOutcome {
    if *slot == value {
        return DispatchOutcome::Unchanged;
    }
    *slot = value;
    DispatchOutcome::Applied
}
