//! Read-side queries over the entries slice.

use crate::model::entry::{normalize_tag, Entry, Mood};

/// Ordering applied by [`EntryListQuery`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntrySort {
    /// Order in which entries were added.
    #[default]
    InsertionOrder,
    NewestFirst,
    OldestFirst,
}

/// Filter and ordering options for listing entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryListQuery {
    pub pinned_only: bool,
    /// Exact tag match after the same normalization stored tags get.
    pub tag: Option<String>,
    /// Matches the effective mood, so entries without a mood count as baseline.
    pub mood: Option<Mood>,
    pub sort: EntrySort,
    pub limit: Option<usize>,
}

impl EntryListQuery {
    pub(crate) fn apply<'a>(&self, entries: &'a [Entry]) -> Vec<&'a Entry> {
        let tag = self.tag.as_deref().and_then(normalize_tag);

        let mut matched = entries
            .iter()
            .filter(|entry| !self.pinned_only || entry.is_pinned)
            .filter(|entry| tag.as_ref().map_or(true, |tag| entry.tags.contains(tag)))
            .filter(|entry| self.mood.map_or(true, |mood| entry.effective_mood() == mood))
            .collect::<Vec<_>>();

        // Stable sorts keep insertion order between entries with equal dates.
        match self.sort {
            EntrySort::InsertionOrder => {}
            EntrySort::NewestFirst => matched.sort_by(|a, b| b.date.cmp(&a.date)),
            EntrySort::OldestFirst => matched.sort_by_key(|entry| entry.date),
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}
