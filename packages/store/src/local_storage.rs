//! # Browser-side persistence — `window.localStorage` and `document.cookie`
//!
//! [`LocalStorageStore`] is the [`KeyValueStore`] used on the **web platform**,
//! and [`DocumentCookies`] is the matching [`CookieStore`]. Both look up the
//! browser object on every call rather than caching it: `web_sys::Storage` is
//! not `Send`, and the lookup is a cheap property access.
//!
//! ## Error handling
//!
//! `localStorage` can be missing (sandboxed iframes) or throw (quota exceeded,
//! Safari private mode). Reads then return `None` and writes are dropped with a
//! `tracing::warn!`, so the UI degrades to "not logged in" instead of crashing.

use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, Storage};

use crate::cookie::{format_set_cookie, parse_cookie_header, CookieOptions, CookieStore};
use crate::kv::KeyValueStore;

/// `window.localStorage`-backed KeyValueStore.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Option<Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = self.storage() else {
            tracing::warn!("localStorage unavailable, dropping write to {}", key);
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            tracing::warn!("localStorage write to {} failed: {:?}", key, e);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// `document.cookie`-backed CookieStore.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentCookies;

impl DocumentCookies {
    pub fn new() -> Self {
        Self
    }

    fn document(&self) -> Option<HtmlDocument> {
        web_sys::window()?.document()?.dyn_into::<HtmlDocument>().ok()
    }
}

impl CookieStore for DocumentCookies {
    fn get_cookie(&self, name: &str) -> Option<String> {
        let header = self.document()?.cookie().ok()?;
        parse_cookie_header(&header).remove(name)
    }

    fn set_cookie(&self, name: &str, value: &str, options: &CookieOptions) {
        let Some(doc) = self.document() else {
            return;
        };
        if let Err(e) = doc.set_cookie(&format_set_cookie(name, value, options)) {
            tracing::warn!("Failed to set cookie {}: {:?}", name, e);
        }
    }

    fn remove_cookie(&self, name: &str) {
        let options = CookieOptions::default().with_max_age(std::time::Duration::ZERO);
        self.set_cookie(name, "", &options);
    }
}
