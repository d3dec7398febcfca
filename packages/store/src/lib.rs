//! # Store crate — durable client-side storage
//!
//! The primitives every other crate uses to remember things between page
//! loads: a string [`KeyValueStore`] and a [`CookieStore`] jar, each with an
//! in-memory backend, a native backend and a browser backend.

pub mod cookie;
pub mod kv;

mod file_store;
mod memory;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::{DocumentCookies, LocalStorageStore};

pub use cookie::{
    format_set_cookie, parse_cookie_header, CookieOptions, CookieStore, MemoryCookies, SameSite,
};
pub use file_store::FileStore;
pub use kv::{KeyValueStore, KeyValueStoreExt};
pub use memory::MemoryStore;
