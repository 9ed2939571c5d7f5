//! # Storage Adapter
//!
//! Key-value persistence for the JSON-shaped collections.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    StorageAdapter Contract                              │
//! │                                                                         │
//! │  load(key)  ──► Ok(Some(value))   previously stored JSON                │
//! │             ──► Ok(None)          never stored                          │
//! │             ──► Err(..)           unreadable; the store treats this     │
//! │                                   as absent and starts empty            │
//! │                                                                         │
//! │  save(key, value) ──► Ok(())      durably written                       │
//! │                   ──► Err(..)     surfaced as StoreError::Persistence;  │
//! │                                   NEVER crashes the session             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keys are one per collection: `cart-collection`, `rentals-collection`,
//! `returns-collection`. The filter config is session-scoped and never
//! stored.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

// =============================================================================
// Storage Error
// =============================================================================

/// Failures of the persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem read/write failed (quota, permissions, missing dir).
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored bytes were not valid JSON.
    #[error("stored value is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Injected failure from the in-memory test backend.
    #[error("storage unavailable")]
    Unavailable,
}

// =============================================================================
// Storage Adapter Trait
// =============================================================================

/// Opaque key-value persistence for JSON-serializable collections.
///
/// Synchronous by design: the state store persists before returning from a
/// transition, and the whole session is a single logical thread.
pub trait StorageAdapter: Send {
    /// Returns the previously stored value for `key`, or `None` if never set.
    fn load(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Durably stores `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &Value) -> Result<(), StorageError>;
}

// =============================================================================
// JSON File Storage
// =============================================================================

/// File-backed storage: one pretty-printed JSON file per key under a data
/// directory (`<dir>/<key>.json`).
#[derive(Debug)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Opens storage rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(JsonFileStorage { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// The directory backing this storage.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StorageAdapter for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = serde_json::from_slice(&bytes)?;
        Ok(Some(value))
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let path = self.path_for(key);
        // Write to a sibling temp file, then rename: a failed write never
        // clobbers the previous good snapshot.
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
        fs::rename(&tmp, &path)?;
        debug!(key, path = %path.display(), "collection saved");
        Ok(())
    }
}

// =============================================================================
// In-Memory Storage
// =============================================================================

/// In-memory backend for tests and ephemeral sessions.
///
/// `fail_saves` simulates a full/unavailable store so the degraded
/// persistence path can be exercised.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
    fail_saves: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// When set, every subsequent `save` fails with
    /// [`StorageError::Unavailable`]. Loads keep working.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl StorageAdapter for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let entries = self.entries.lock().expect("storage mutex poisoned");
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable);
        }
        let mut entries = self.entries.lock().expect("storage mutex poisoned");
        entries.insert(key.to_string(), value.clone());
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_storage_absent_key_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::open(dir.path()).unwrap();
        assert!(storage.load("cart-collection").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::open(dir.path()).unwrap();
        let value = json!([{"bookId": 7, "title": "Dune"}]);

        storage.save("cart-collection", &value).unwrap();
        assert_eq!(storage.load("cart-collection").unwrap(), Some(value));
    }

    #[test]
    fn test_file_storage_save_replaces_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::open(dir.path()).unwrap();

        storage.save("rentals-collection", &json!([1])).unwrap();
        storage.save("rentals-collection", &json!([1, 2])).unwrap();
        assert_eq!(
            storage.load("rentals-collection").unwrap(),
            Some(json!([1, 2]))
        );
    }

    #[test]
    fn test_file_storage_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::open(dir.path()).unwrap();
        fs::write(dir.path().join("returns-collection.json"), b"{not json").unwrap();

        assert!(matches!(
            storage.load("returns-collection"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        storage.save("k", &json!({"a": 1})).unwrap();
        assert_eq!(storage.load("k").unwrap(), Some(json!({"a": 1})));
        assert!(storage.load("other").unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_failure_toggle() {
        let storage = MemoryStorage::new();
        storage.save("k", &json!(1)).unwrap();

        storage.set_fail_saves(true);
        assert!(matches!(
            storage.save("k", &json!(2)),
            Err(StorageError::Unavailable)
        ));
        // previous value untouched, loads still work
        assert_eq!(storage.load("k").unwrap(), Some(json!(1)));

        storage.set_fail_saves(false);
        storage.save("k", &json!(2)).unwrap();
    }
}
