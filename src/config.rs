//! Persisted configuration interface and updater settings

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[cfg(test)]
use mockall::automock;

use serde::Deserialize;
use serde_json::Value;

/// Persisted schema version of the config file; written by the migrator.
pub const KEY_CONFIG_VERSION: &str = "Config.Version";

/// Last known host revision; written by the compatibility gate.
pub const KEY_GAME_VERSION: &str = "Config.GameVersion";

/// Key-value configuration store collaborator.
///
/// The embedding plugin supplies the real store (typically a config file
/// managed by the mod loader). Values are interchanged as JSON values;
/// `bind` registers a key with its default and description so the store
/// can materialize missing entries.
#[cfg_attr(test, automock)]
pub trait ConfigStore: Send + Sync {
    /// Register a key with its default value and description.
    fn bind(&self, key: &str, default: Value, description: &str);

    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value);

    /// Suppress or restore write-through saves during bulk initialization.
    fn set_autosave(&self, autosave: bool);

    /// Flush pending writes.
    fn save(&self);
}

/// Typed accessors over the JSON value interchange.
pub trait ConfigStoreExt: ConfigStore {
    fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_str().map(str::to_string))
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }
}

impl<S: ConfigStore + ?Sized> ConfigStoreExt for S {}

/// Updater settings, deserialized from the embedding plugin's settings blob.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdaterConfig {
    /// Master switch for background update checks.
    pub check_for_updates: bool,
    /// Include prerelease channels when checking.
    pub notify_prerelease: bool,
    /// GitHub repository the release feed is read from ("owner/repo").
    pub repository: String,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            check_for_updates: true,
            notify_prerelease: false,
            repository: String::new(),
        }
    }
}

/// In-memory store, used by the tests and as a template for real adapters.
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Value>>,
    autosave: AtomicBool,
    save_count: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            autosave: AtomicBool::new(true),
            save_count: AtomicUsize::new(0),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of explicit flushes so far.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Value>> {
        // A poisoned map of plain values is still usable.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConfigStore for MemoryStore {
    fn bind(&self, key: &str, default: Value, _description: &str) {
        self.lock_entries().entry(key.to_string()).or_insert(default);
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.lock_entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.lock_entries().insert(key.to_string(), value);
        if self.autosave.load(Ordering::SeqCst) {
            self.save();
        }
    }

    fn set_autosave(&self, autosave: bool) {
        self.autosave.store(autosave, Ordering::SeqCst);
    }

    fn save(&self) {
        self.save_count.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn updater_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<UpdaterConfig>(json!({
            "repository": "acme/qol-mod"
        }))
        .unwrap();

        assert_eq!(result.repository, "acme/qol-mod");
        assert!(result.check_for_updates);
        assert!(!result.notify_prerelease);
    }

    #[test]
    fn updater_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<UpdaterConfig>(json!({
            "checkForUpdates": false,
            "notifyPrerelease": true,
            "repository": "acme/qol-mod"
        }))
        .unwrap();

        assert_eq!(
            result,
            UpdaterConfig {
                check_for_updates: false,
                notify_prerelease: true,
                repository: "acme/qol-mod".to_string(),
            }
        );
    }

    #[test]
    fn bind_keeps_an_existing_value() {
        let store = MemoryStore::new();
        store.set(KEY_GAME_VERSION, json!(100));
        store.bind(KEY_GAME_VERSION, json!(200), "Last known host revision");

        assert_eq!(store.get_i64(KEY_GAME_VERSION), Some(100));
    }

    #[test]
    fn bind_materializes_the_default_for_a_missing_key() {
        let store = MemoryStore::new();
        store.bind(KEY_GAME_VERSION, json!(200), "Last known host revision");

        assert_eq!(store.get_i64(KEY_GAME_VERSION), Some(200));
    }

    #[test]
    fn set_autosave_suppresses_write_through_saves() {
        let store = MemoryStore::new();
        store.set_autosave(false);
        store.set("a", json!(1));
        store.set("b", json!(2));
        assert_eq!(store.save_count(), 0);

        store.set_autosave(true);
        store.save();
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn typed_accessors_return_none_for_mismatched_types() {
        let store = MemoryStore::new();
        store.set("key", json!("text"));

        assert_eq!(store.get_str("key"), Some("text".to_string()));
        assert_eq!(store.get_i64("key"), None);
        assert_eq!(store.get_bool("key"), None);
    }
}
