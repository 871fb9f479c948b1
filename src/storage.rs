//! Durable client-side key-value storage.
//!
//! [`LocalStore`] keeps a single JSON object in a file under the data
//! directory and exposes typed get/set/remove over its keys. It backs the
//! persisted session token and the market price-history cache.
//!
//! Reads never fail: an absent or malformed file yields an empty store.
//! Writes are atomic (temp file + rename) and failures are logged rather
//! than propagated, so a full disk degrades to in-memory state instead of
//! breaking the view that triggered the write.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

/// File name of the store inside the data directory.
const STORE_FILE: &str = "store.json";

/// Shared handle to the on-disk key-value store.
#[derive(Clone)]
pub struct LocalStore {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl LocalStore {
    /// Opens the store under `data_dir`, loading any existing contents.
    ///
    /// Absent or malformed files are treated as empty.
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(STORE_FILE);
        let entries = std::fs::read(&path)
            .ok()
            .and_then(|raw| serde_json::from_slice::<Map<String, Value>>(&raw).ok())
            .unwrap_or_default();

        Self {
            inner: Arc::new(Mutex::new(Inner { path, entries })),
        }
    }

    /// Returns the deserialized value under `key`, or `None` if the key is
    /// absent or its payload does not deserialize to `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        // The map stays consistent across panics, so a poisoned lock is
        // recoverable.
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner
            .entries
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Stores `value` under `key` and flushes the store to disk.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match serde_json::to_value(value) {
            Ok(json) => {
                inner.entries.insert(key.to_string(), json);
                inner.flush();
            }
            Err(e) => warn!("failed to serialize value for key {key}: {e}"),
        }
    }

    /// Removes `key` (if present) and flushes the store to disk.
    pub fn remove(&self, key: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.entries.remove(key).is_some() {
            inner.flush();
        }
    }
}

impl Inner {
    /// Writes the full map to disk via a temp file + rename.
    fn flush(&self) {
        if let Some(parent) = self.path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("failed to create data dir {}: {e}", parent.display());
            return;
        }

        let mut bytes = match serde_json::to_vec_pretty(&self.entries) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("failed to serialize store: {e}");
                return;
            }
        };
        bytes.push(b'\n');

        let tmp = self.path.with_extension("json.tmp");
        if let Err(e) = std::fs::write(&tmp, &bytes) {
            warn!("failed to write store temp file: {e}");
            return;
        }
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            warn!("failed to replace store file: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_values_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path());
        store.set("token", &"abc123".to_string());
        store.set("count", &42u32);

        let reopened = LocalStore::open(dir.path());
        assert_eq!(reopened.get::<String>("token").as_deref(), Some("abc123"));
        assert_eq!(reopened.get::<u32>("count"), Some(42));
    }

    #[test]
    fn remove_deletes_persisted_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path());
        store.set("token", &"abc".to_string());
        store.remove("token");

        let reopened = LocalStore::open(dir.path());
        assert_eq!(reopened.get::<String>("token"), None);
    }

    #[test]
    fn malformed_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORE_FILE), b"{not json").unwrap();

        let store = LocalStore::open(dir.path());
        assert_eq!(store.get::<String>("anything"), None);
    }

    #[test]
    fn survives_a_poisoned_lock() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path());

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        store.set("token", &"abc".to_string());
        assert_eq!(store.get::<String>("token").as_deref(), Some("abc"));
        store.remove("token");
        assert_eq!(store.get::<String>("token"), None);
    }

    #[test]
    fn wrong_type_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path());
        store.set("count", &"not a number".to_string());
        assert_eq!(store.get::<u32>("count"), None);
    }
}
