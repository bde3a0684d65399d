use moodjournal_core::{
    Action, Entry, KeyValueStorage, Locale, MemoryStorage, Mood, SqliteStorage, StorageError,
    StorageResult, Store, StoreConfig, StoreError, Theme,
};

/// Memory storage that fails reads or deletes for one chosen key.
#[derive(Default)]
struct BrokenKeyStorage {
    inner: MemoryStorage,
    unreadable: Option<&'static str>,
    undeletable: Option<&'static str>,
}

impl KeyValueStorage for BrokenKeyStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        if self.unreadable == Some(key) {
            return Err(StorageError::Unavailable(format!("cannot read {key}")));
        }
        self.inner.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.inner.set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        if self.undeletable == Some(key) {
            return Err(StorageError::Unavailable(format!("cannot delete {key}")));
        }
        self.inner.remove_item(key)
    }
}

fn storage_with_entry_and_name() -> MemoryStorage {
    let mut store = Store::new(MemoryStorage::new(), StoreConfig::default());
    store.dispatch(Action::AddEntry(Entry::with_id("1", "hello", 0)));
    store.dispatch(Action::SetName("Ada".to_string()));
    store.into_storage()
}

#[test]
fn slices_survive_restart_on_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.db");

    let mut entry = Entry::with_id("1", "hello", 1_000);
    entry.mood = Some(Mood::Happy);
    entry.images_url = vec!["file:///one.jpg".to_string(), "file:///two.jpg".to_string()];
    entry.tags.insert("gratitude".to_string());

    let before = {
        let storage = SqliteStorage::open(&path).unwrap();
        let mut store = Store::rehydrate(storage, StoreConfig::default());
        store.dispatch(Action::AddEntry(entry));
        store.dispatch(Action::SetName("Ada".to_string()));
        store.dispatch(Action::SetWallet("0xabc".to_string()));
        store.dispatch(Action::SetTheme(Theme::Dark));
        store.dispatch(Action::SetLocale(Locale::new("fr")));
        assert!(store.is_idle());
        store.state().clone()
    };

    let storage = SqliteStorage::open(&path).unwrap();
    let store = Store::rehydrate(storage, StoreConfig::default());
    assert_eq!(store.entries(), before.entries.value.as_slice());
    assert_eq!(store.profile(), &before.profile);
    assert_eq!(store.theme(), Theme::Dark);
    assert_eq!(store.locale().as_str(), "fr");
}

#[test]
fn empty_storage_rehydrates_to_defaults() {
    let store = Store::rehydrate(MemoryStorage::new(), StoreConfig::default());
    assert!(store.entries().is_empty());
    assert_eq!(store.theme(), Theme::System);
    assert_eq!(store.locale().as_str(), "en");
    assert!(store.profile().name.is_empty());
}

#[test]
fn corrupted_slice_falls_back_to_default_without_touching_others() {
    let mut storage = MemoryStorage::new();
    storage.set_item("persist:entries", "{not json").unwrap();
    storage
        .set_item(
            "persist:profile",
            r#"{"name":"Ada","email":"ada@example.com","wallet":""}"#,
        )
        .unwrap();

    let store = Store::rehydrate(storage, StoreConfig::default());
    assert!(store.entries().is_empty());
    assert_eq!(store.profile().name, "Ada");
}

#[test]
fn try_rehydrate_reports_corrupted_slice() {
    let mut storage = MemoryStorage::new();
    storage.set_item("persist:theme", r#"{"value":"sepia"}"#).unwrap();

    let err = match Store::try_rehydrate(storage, StoreConfig::default()) {
        Ok(_) => panic!("corrupted theme should fail strict rehydration"),
        Err(err) => err,
    };
    assert!(matches!(
        err,
        StoreError::CorruptSlice {
            key: "persist:theme",
            ..
        }
    ));
}

#[test]
fn selected_date_is_not_persisted() {
    let mut store = Store::new(MemoryStorage::new(), StoreConfig::default());
    store.dispatch(Action::SetDate(123));
    store.persist_all();

    let storage = store.into_storage();
    assert!(storage.keys().iter().all(|key| !key.contains("date")));

    let restored = Store::rehydrate(storage, StoreConfig::default());
    assert_ne!(restored.date(), 123);
}

#[test]
fn stored_duplicate_ids_keep_first_occurrence() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(
            "persist:entries",
            r#"{"value":[
                {"id":"1","content":"first","date":1},
                {"id":"2","content":"second","date":2},
                {"id":"1","content":"again","date":3}
            ]}"#,
        )
        .unwrap();

    let store = Store::rehydrate(storage, StoreConfig::default());
    assert_eq!(store.entries().len(), 2);
    assert_eq!(store.find_entry("1").unwrap().content, "first");
}

#[test]
fn purge_clears_storage_and_state() {
    let mut store = Store::new(MemoryStorage::new(), StoreConfig::default());
    store.dispatch(Action::AddEntry(Entry::with_id("1", "hello", 0)));
    store.dispatch(Action::SetName("Ada".to_string()));
    assert!(!store.storage().is_empty());

    store.purge().unwrap();
    assert!(store.storage().is_empty());
    assert!(store.entries().is_empty());
    assert!(store.profile().name.is_empty());
}

#[test]
fn unreadable_slice_falls_back_to_default_and_restores_others() {
    let storage = BrokenKeyStorage {
        inner: storage_with_entry_and_name(),
        unreadable: Some("persist:entries"),
        ..BrokenKeyStorage::default()
    };

    let store = Store::rehydrate(storage, StoreConfig::default());
    assert!(store.entries().is_empty());
    assert_eq!(store.profile().name, "Ada");
}

#[test]
fn try_rehydrate_reports_unreadable_slice() {
    let storage = BrokenKeyStorage {
        inner: storage_with_entry_and_name(),
        unreadable: Some("persist:entries"),
        ..BrokenKeyStorage::default()
    };

    match Store::try_rehydrate(storage, StoreConfig::default()) {
        Err(StoreError::Storage(StorageError::Unavailable(message))) => {
            assert!(message.contains("persist:entries"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unreadable entries should fail strict rehydration"),
    }
}

#[test]
fn partially_failed_purge_still_resets_state_and_overwrites_leftovers() {
    let storage = BrokenKeyStorage {
        undeletable: Some("persist:theme"),
        ..BrokenKeyStorage::default()
    };
    let mut store = Store::new(storage, StoreConfig::default());
    store.dispatch(Action::AddEntry(Entry::with_id("1", "hello", 0)));
    store.dispatch(Action::SetTheme(Theme::Dark));

    assert!(matches!(store.purge(), Err(StoreError::Storage(_))));
    assert!(store.entries().is_empty());
    assert_eq!(store.theme(), Theme::System);
    assert!(store
        .storage()
        .get_item("persist:entries")
        .unwrap()
        .is_none());
    assert_eq!(store.pending_writes(), 1);

    // The next autoflush also writes the queued default theme.
    store.dispatch(Action::SetName("Ada".to_string()));
    assert!(store.is_idle());

    let restored = Store::rehydrate(store.into_storage(), StoreConfig::default());
    assert!(restored.entries().is_empty());
    assert_eq!(restored.theme(), Theme::System);
    assert_eq!(restored.profile().name, "Ada");
}
