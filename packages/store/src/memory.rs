use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::kv::KeyValueStore;

/// In-memory KeyValueStore for testing and headless use.
///
/// Clones share the same underlying map, so a test can hand one clone to the
/// code under test and inspect the other.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::KeyValueStoreExt;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        email: String,
        roles: Vec<String>,
    }

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("missing").is_none());

        store.set("greeting", "hello");
        assert_eq!(store.get("greeting").as_deref(), Some("hello"));

        store.set("greeting", "bonjour");
        assert_eq!(store.get("greeting").as_deref(), Some("bonjour"));
        assert_eq!(store.len(), 1);

        store.remove("greeting");
        assert!(store.get("greeting").is_none());
        assert!(store.is_empty());

        // Removing twice is fine
        store.remove("greeting");
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v");
        assert_eq!(other.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_json_helpers() {
        let store = MemoryStore::new();
        let profile = Profile {
            email: "guide@example.com".to_string(),
            roles: vec!["TourGuide".to_string()],
        };
        store.set_json("profile", &profile).unwrap();

        let loaded: Option<Profile> = store.get_json("profile").unwrap();
        assert_eq!(loaded, Some(profile));

        let missing: Option<Profile> = store.get_json("nope").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_json_helpers_report_corruption() {
        let store = MemoryStore::new();
        store.set("profile", "{not json");
        let loaded: Result<Option<Profile>, _> = store.get_json("profile");
        assert!(loaded.is_err());
    }
}
