//! Persistent user settings and their change notifications.
//!
//! Values live in the SQLite `preferences` table as text. Writes go through
//! an [`Editor`] and are applied atomically; every key whose stored value
//! actually changed is queued for the registered listener, which drains the
//! queue with [`PreferenceStore::take_change`]. Handlers that write back to
//! the store therefore never re-enter themselves: their own change is simply
//! queued behind the one being handled.

use crate::db;
use crate::error::{Error, Result};
use rusqlite::Connection;
use std::collections::{BTreeSet, VecDeque};
use std::path::Path;
use tracing::{debug, warn};

pub const CHOICES: &str = "pref_numberOfChoices";
pub const REGIONS: &str = "pref_regionsToInclude";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Choices,
    Regions,
}

impl PreferenceKey {
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKey::Choices => CHOICES,
            PreferenceKey::Regions => REGIONS,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            CHOICES => Some(PreferenceKey::Choices),
            REGIONS => Some(PreferenceKey::Regions),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceDefaults {
    pub choices: usize,
    pub regions: BTreeSet<String>,
}

impl Default for PreferenceDefaults {
    fn default() -> Self {
        PreferenceDefaults {
            choices: 4,
            regions: BTreeSet::from(["North_America".to_string()]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

pub struct PreferenceStore {
    conn: Connection,
    listener: Option<ListenerId>,
    next_listener: u64,
    pending: VecDeque<PreferenceKey>,
}

impl PreferenceStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::with_connection(db::init_db(path)?))
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self::with_connection(db::init_in_memory()?))
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    fn with_connection(conn: Connection) -> Self {
        PreferenceStore {
            conn,
            listener: None,
            next_listener: 1,
            pending: VecDeque::new(),
        }
    }

    /// Writes defaults for keys that have no value yet, or for every key
    /// when `read_again` is set. Never notifies the listener.
    pub fn set_defaults(&mut self, defaults: &PreferenceDefaults, read_again: bool) -> Result<()> {
        let choices = defaults.choices.to_string();
        let regions = serde_json::to_string(&defaults.regions)?;

        for (key, value) in [(CHOICES, choices), (REGIONS, regions)] {
            if read_again || db::preferences::get_value(&self.conn, key)?.is_none() {
                debug!(key, value = %value, "Applying preference default");
                db::preferences::put_value(&self.conn, key, &value)?;
            }
        }
        Ok(())
    }

    /// Drops every stored value and writes the defaults again.
    pub fn reset_to_defaults(&mut self, defaults: &PreferenceDefaults) -> Result<()> {
        db::preferences::clear(&self.conn)?;
        self.set_defaults(defaults, true)
    }

    pub fn contains(&self, key: PreferenceKey) -> Result<bool> {
        Ok(db::preferences::get_value(&self.conn, key.as_str())?.is_some())
    }

    pub fn get_string(&self, key: PreferenceKey, default: &str) -> Result<String> {
        Ok(db::preferences::get_value(&self.conn, key.as_str())?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Reads an integer stored as text; unparsable values fall back to
    /// `default`.
    pub fn get_int(&self, key: PreferenceKey, default: usize) -> Result<usize> {
        let Some(raw) = db::preferences::get_value(&self.conn, key.as_str())? else {
            return Ok(default);
        };
        match raw.trim().parse::<usize>() {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!(key = key.as_str(), value = %raw, "Preference is not an integer");
                Ok(default)
            }
        }
    }

    pub fn get_string_set(&self, key: PreferenceKey) -> Result<Option<BTreeSet<String>>> {
        match db::preferences::get_value(&self.conn, key.as_str())? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn edit(&mut self) -> Editor<'_> {
        Editor {
            store: self,
            changes: Vec::new(),
        }
    }

    /// Registers the single change listener.
    pub fn register_listener(&mut self) -> Result<ListenerId> {
        if self.listener.is_some() {
            return Err(Error::ListenerAlreadyRegistered);
        }
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listener = Some(id);
        debug!(?id, "Preference listener registered");
        Ok(id)
    }

    /// Unregisters `id` and discards its undelivered notifications.
    /// Returns false if `id` was not the registered listener.
    pub fn unregister_listener(&mut self, id: ListenerId) -> bool {
        if self.listener != Some(id) {
            return false;
        }
        self.listener = None;
        self.pending.clear();
        debug!(?id, "Preference listener unregistered");
        true
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Next undelivered change notification, in write order.
    pub fn take_change(&mut self) -> Option<PreferenceKey> {
        self.pending.pop_front()
    }

    pub fn pending_changes(&self) -> usize {
        self.pending.len()
    }
}

/// Batches preference writes; nothing is stored until [`Editor::apply`].
pub struct Editor<'a> {
    store: &'a mut PreferenceStore,
    changes: Vec<(PreferenceKey, Option<String>)>,
}

impl Editor<'_> {
    fn stage(&mut self, key: PreferenceKey, value: Option<String>) {
        self.changes.retain(|(staged, _)| *staged != key);
        self.changes.push((key, value));
    }

    pub fn put_string(mut self, key: PreferenceKey, value: &str) -> Self {
        self.stage(key, Some(value.to_string()));
        self
    }

    pub fn put_int(mut self, key: PreferenceKey, value: usize) -> Self {
        self.stage(key, Some(value.to_string()));
        self
    }

    pub fn put_string_set(mut self, key: PreferenceKey, value: &BTreeSet<String>) -> Result<Self> {
        let encoded = serde_json::to_string(value)?;
        self.stage(key, Some(encoded));
        Ok(self)
    }

    pub fn remove(mut self, key: PreferenceKey) -> Self {
        self.stage(key, None);
        self
    }

    /// Writes all staged values in one transaction and queues a
    /// notification for each key whose value changed. Returns the changed
    /// keys.
    pub fn apply(self) -> Result<Vec<PreferenceKey>> {
        let Editor { store, changes } = self;
        let mut changed = Vec::new();

        let tx = store.conn.transaction()?;
        for (key, value) in changes {
            let current = db::preferences::get_value(&tx, key.as_str())?;
            if current == value {
                continue;
            }
            match &value {
                Some(value) => db::preferences::put_value(&tx, key.as_str(), value)?,
                None => {
                    db::preferences::remove_value(&tx, key.as_str())?;
                }
            }
            changed.push(key);
        }
        tx.commit()?;

        if store.listener.is_some() {
            store.pending.extend(changed.iter().copied());
        }
        debug!(?changed, "Preferences applied");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keys_match_stored_names() {
        assert_eq!(PreferenceKey::Choices.as_str(), "pref_numberOfChoices");
        assert_eq!(PreferenceKey::Regions.as_str(), "pref_regionsToInclude");
        assert_eq!(PreferenceKey::from_key(REGIONS), Some(PreferenceKey::Regions));
        assert_eq!(PreferenceKey::from_key("other"), None);
    }

    #[test]
    fn test_defaults_only_fill_missing_values() {
        let mut store = PreferenceStore::in_memory().unwrap();
        store
            .edit()
            .put_int(PreferenceKey::Choices, 6)
            .apply()
            .unwrap();

        store.set_defaults(&PreferenceDefaults::default(), false).unwrap();

        assert_eq!(store.get_int(PreferenceKey::Choices, 0).unwrap(), 6);
        assert_eq!(
            store.get_string_set(PreferenceKey::Regions).unwrap(),
            Some(regions(&["North_America"]))
        );
    }

    #[test]
    fn test_defaults_with_read_again_overwrite() {
        let mut store = PreferenceStore::in_memory().unwrap();
        store
            .edit()
            .put_int(PreferenceKey::Choices, 6)
            .apply()
            .unwrap();

        store.set_defaults(&PreferenceDefaults::default(), true).unwrap();
        assert_eq!(store.get_int(PreferenceKey::Choices, 0).unwrap(), 4);
    }

    #[test]
    fn test_defaults_do_not_notify() {
        let mut store = PreferenceStore::in_memory().unwrap();
        store.register_listener().unwrap();

        store.set_defaults(&PreferenceDefaults::default(), false).unwrap();
        assert!(store.take_change().is_none());
    }

    #[test]
    fn test_get_int_falls_back_on_garbage() {
        let mut store = PreferenceStore::in_memory().unwrap();
        store
            .edit()
            .put_string(PreferenceKey::Choices, "lots")
            .apply()
            .unwrap();

        assert_eq!(store.get_int(PreferenceKey::Choices, 4).unwrap(), 4);
        assert_eq!(store.get_string(PreferenceKey::Choices, "").unwrap(), "lots");
    }

    #[test]
    fn test_missing_string_set_is_none() {
        let store = PreferenceStore::in_memory().unwrap();
        assert!(store.get_string_set(PreferenceKey::Regions).unwrap().is_none());
        assert!(!store.contains(PreferenceKey::Regions).unwrap());
    }

    #[test]
    fn test_apply_notifies_registered_listener_in_order() {
        let mut store = PreferenceStore::in_memory().unwrap();
        store.register_listener().unwrap();

        let changed = store
            .edit()
            .put_int(PreferenceKey::Choices, 6)
            .put_string_set(PreferenceKey::Regions, &regions(&["Asia"]))
            .unwrap()
            .apply()
            .unwrap();

        assert_eq!(changed, vec![PreferenceKey::Choices, PreferenceKey::Regions]);
        assert_eq!(store.take_change(), Some(PreferenceKey::Choices));
        assert_eq!(store.take_change(), Some(PreferenceKey::Regions));
        assert_eq!(store.take_change(), None);
    }

    #[test]
    fn test_unchanged_value_is_not_notified() {
        let mut store = PreferenceStore::in_memory().unwrap();
        store.set_defaults(&PreferenceDefaults::default(), false).unwrap();
        store.register_listener().unwrap();

        let changed = store
            .edit()
            .put_int(PreferenceKey::Choices, 4)
            .apply()
            .unwrap();

        assert!(changed.is_empty());
        assert_eq!(store.pending_changes(), 0);
    }

    #[test]
    fn test_no_queue_without_listener() {
        let mut store = PreferenceStore::in_memory().unwrap();
        store
            .edit()
            .put_int(PreferenceKey::Choices, 3)
            .apply()
            .unwrap();
        assert_eq!(store.pending_changes(), 0);
    }

    #[test]
    fn test_single_listener_registration() {
        let mut store = PreferenceStore::in_memory().unwrap();
        let id = store.register_listener().unwrap();

        assert!(matches!(
            store.register_listener(),
            Err(Error::ListenerAlreadyRegistered)
        ));
        assert!(store.unregister_listener(id));
        assert!(!store.unregister_listener(id));
        assert!(store.register_listener().is_ok());
    }

    #[test]
    fn test_staging_same_key_twice_keeps_last_value() {
        let mut store = PreferenceStore::in_memory().unwrap();
        store.register_listener().unwrap();

        store
            .edit()
            .put_int(PreferenceKey::Choices, 3)
            .put_int(PreferenceKey::Choices, 8)
            .apply()
            .unwrap();

        assert_eq!(store.get_int(PreferenceKey::Choices, 0).unwrap(), 8);
        assert_eq!(store.take_change(), Some(PreferenceKey::Choices));
        assert_eq!(store.take_change(), None);
    }

    #[test]
    fn test_remove_notifies_and_clears() {
        let mut store = PreferenceStore::in_memory().unwrap();
        store.set_defaults(&PreferenceDefaults::default(), false).unwrap();
        store.register_listener().unwrap();

        store.edit().remove(PreferenceKey::Regions).apply().unwrap();

        assert!(store.get_string_set(PreferenceKey::Regions).unwrap().is_none());
        assert_eq!(store.take_change(), Some(PreferenceKey::Regions));
    }

    #[test]
    fn test_empty_set_is_stored_as_empty() {
        let mut store = PreferenceStore::in_memory().unwrap();
        store
            .edit()
            .put_string_set(PreferenceKey::Regions, &BTreeSet::new())
            .unwrap()
            .apply()
            .unwrap();

        assert_eq!(
            store.get_string_set(PreferenceKey::Regions).unwrap(),
            Some(BTreeSet::new())
        );
    }

    #[test]
    fn test_store_persists_on_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("prefs.db");

        {
            let mut store = PreferenceStore::open(&path).unwrap();
            store
                .edit()
                .put_int(PreferenceKey::Choices, 9)
                .apply()
                .unwrap();
        }

        let store = PreferenceStore::open(&path).unwrap();
        assert_eq!(store.get_int(PreferenceKey::Choices, 0).unwrap(), 9);
    }
}
