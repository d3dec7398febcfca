//! # Key/value store — the durable client storage seam
//!
//! Everything the client persists between page loads (the session identity, the
//! selected dashboard role) goes through [`KeyValueStore`]. The trait is
//! deliberately tiny: string keys, string values, whole-value replacement. That
//! is the contract `window.localStorage` offers, and it is easy to honour on
//! native targets with a directory of files or a `HashMap`.
//!
//! | Backend | Module | Used on |
//! |---------|--------|---------|
//! | [`crate::MemoryStore`] | `memory` | tests, headless tools |
//! | [`crate::FileStore`] | `file_store` | desktop builds |
//! | `LocalStorageStore` | `local_storage` | browser (`wasm32` + `web` feature) |
//!
//! ## Error handling
//!
//! Reads return `None` when the key is missing *or* the backend is unavailable;
//! writes never fail the caller. Backends log failures with `tracing::warn!`.
//! A broken storage backend therefore degrades to "nobody is logged in" rather
//! than crashing the UI.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Durable string storage keyed by name.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str);

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str);
}

/// JSON helpers layered over any [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Read and decode a JSON value.
    ///
    /// Returns `Ok(None)` when the key is missing and `Err` when the stored
    /// text is not valid JSON for `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        match self.get(key) {
            Some(raw) => serde_json::from_str(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Encode `value` as JSON and store it.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::rc::Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}
