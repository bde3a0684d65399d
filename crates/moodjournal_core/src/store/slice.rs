//! Slice identities and their storage keys.

/// Named partition of the application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SliceKey {
    Date,
    Entries,
    Theme,
    Locale,
    Profile,
}

impl SliceKey {
    pub const ALL: [SliceKey; 5] = [
        SliceKey::Date,
        SliceKey::Entries,
        SliceKey::Theme,
        SliceKey::Locale,
        SliceKey::Profile,
    ];

    /// Slices written to durable storage. `date` is session-only.
    pub const PERSISTED: [SliceKey; 4] = [
        SliceKey::Entries,
        SliceKey::Theme,
        SliceKey::Locale,
        SliceKey::Profile,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Entries => "entries",
            Self::Theme => "theme",
            Self::Locale => "locale",
            Self::Profile => "profile",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Storage key for persisted slices, `None` for session-only ones.
    pub fn storage_key(self) -> Option<&'static str> {
        match self {
            Self::Date => None,
            Self::Entries => Some("persist:entries"),
            Self::Theme => Some("persist:theme"),
            Self::Locale => Some("persist:locale"),
            Self::Profile => Some("persist:profile"),
        }
    }

    pub fn is_persisted(self) -> bool {
        self.storage_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::SliceKey;

    #[test]
    fn names_round_trip_and_date_is_not_persisted() {
        for key in SliceKey::ALL {
            assert_eq!(SliceKey::from_name(key.name()), Some(key));
        }
        assert!(!SliceKey::Date.is_persisted());
        assert!(SliceKey::PERSISTED.iter().all(|key| key.is_persisted()));
        assert_eq!(SliceKey::from_name("settings"), None);
    }
}
