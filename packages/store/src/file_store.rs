//! # Filesystem-backed key/value store
//!
//! [`FileStore`] is a [`KeyValueStore`] implementation that keeps one file per
//! key. It is used on desktop builds so a login survives an app restart, the
//! same way `localStorage` does in the browser.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── tourbook%2Esession        # session identity JSON
//! └── tourbook%2Eactive_role    # plain role name
//! ```
//!
//! Key bytes outside `[A-Za-z0-9_-]` are percent-encoded, so two keys never
//! share a file and a key can never escape the base directory.
//!
//! Writes go to `<file>~tmp` first and are renamed into place, so a reader sees
//! either the old value or the new one, never a truncated file. `~` is always
//! encoded in file names, so no key maps onto a temp file.
//!
//! ## Platform data directories
//!
//! Callers normally pass `dirs::data_dir().join("tourbook")`:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/tourbook/` |
//! | Linux | `~/.local/share/tourbook/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\tourbook\` |

use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::kv::KeyValueStore;

/// Filesystem-backed KeyValueStore for desktop persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base.join(file_name_for_key(key))
    }
}

/// Bytes left as-is in file names. Everything else, `.` and `%` included, is
/// written as `%XX`.
const KEY_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

const TEMP_SUFFIX: &str = "~tmp";

fn file_name_for_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_ESCAPES).to_string()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.base) {
            tracing::warn!("Failed to create store directory {}: {}", self.base.display(), e);
            return;
        }
        let name = file_name_for_key(key);
        let path = self.base.join(&name);
        let tmp = self.base.join(format!("{name}{TEMP_SUFFIX}"));
        if let Err(e) = std::fs::write(&tmp, value) {
            tracing::warn!("Failed to write {}: {}", tmp.display(), e);
            return;
        }
        if let Err(e) = std::fs::rename(&tmp, &path) {
            tracing::warn!("Failed to replace {}: {}", path.display(), e);
            let _ = std::fs::remove_file(&tmp);
        }
    }

    fn remove(&self, key: &str) {
        let path = self.key_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
}
