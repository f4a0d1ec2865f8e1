#![forbid(unsafe_code)]

//! Key/value storage for layouts and small markers.
//!
//! [`StorageBackend`] mirrors the browser's `localStorage`: string keys,
//! string values, last write wins. [`MemoryStorage`] backs tests and
//! headless hosts; [`FileStorage`] (feature `state-persistence`) keeps every
//! entry in one JSON file.
//!
//! [`LayoutStore`] sits on top and handles the layout document. A value
//! that cannot be read or decoded is reported as absent, never as an error,
//! so a corrupt entry only ever costs the user their saved arrangement.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Backend read fails | I/O, permissions | `LayoutStore::load` returns `None` |
//! | Stored JSON is malformed | Truncated write, manual edit | `None`, warning logged |
//! | Write fails | Disk full | `StorageError` returned to the caller |

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use folio_layout::{LayoutSnapshot, STORAGE_KEY, SnapshotLoad};

/// Errors raised by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key/value store.
pub trait StorageBackend {
    /// Value under `key`, if any.
    fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing what was there.
    fn save(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> StorageResult<()>;

    /// Short name for diagnostics.
    fn name(&self) -> &'static str;
}

/// In-memory backend. Clones share the same entries, like several handles
/// onto one `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.lock().remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(feature = "state-persistence")]
pub use file::FileStorage;

#[cfg(feature = "state-persistence")]
mod file {
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{StorageBackend, StorageResult};

    /// Every entry in one JSON object on disk.
    ///
    /// Writes go to a sibling temp file that is then renamed over the
    /// target, so a crash mid-write leaves the previous file intact.
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
            let text = match fs::read_to_string(&self.path) {
                Ok(text) => text,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
                Err(e) => return Err(e.into()),
            };
            match serde_json::from_str(&text) {
                Ok(map) => Ok(map),
                Err(e) => {
                    tracing::warn!(
                        target: "folio.storage",
                        path = %self.path.display(),
                        error = %e,
                        "storage file unreadable, starting empty"
                    );
                    Ok(BTreeMap::new())
                }
            }
        }

        fn write_all(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let tmp = self.path.with_extension("json.tmp");
            fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        }
    }

    impl StorageBackend for FileStorage {
        fn load(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.read_all()?.remove(key))
        }

        fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
            let mut entries = self.read_all()?;
            entries.insert(key.to_owned(), value.to_owned());
            self.write_all(&entries)
        }

        fn remove(&mut self, key: &str) -> StorageResult<()> {
            let mut entries = self.read_all()?;
            if entries.remove(key).is_some() {
                self.write_all(&entries)?;
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "file"
        }
    }
}

/// Reads and writes the layout document under one storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutStore {
    key: String,
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::new(STORAGE_KEY)
    }
}

impl LayoutStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored layout, migrated and repaired. Any failure reads as absent.
    #[must_use]
    pub fn load(
        &self,
        backend: &dyn StorageBackend,
        defaults: &LayoutSnapshot,
    ) -> Option<SnapshotLoad> {
        let raw = match backend.load(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(target: "folio.storage", backend = backend.name(), error = %e, "layout read failed");
                return None;
            }
        };
        match LayoutSnapshot::from_json(&raw, defaults) {
            Ok(load) => {
                for warning in &load.warnings {
                    tracing::info!(target: "folio.storage", %warning, "layout repaired on load");
                }
                Some(load)
            }
            Err(e) => {
                tracing::warn!(target: "folio.storage", error = %e, "stored layout ignored");
                None
            }
        }
    }

    /// Persist `snapshot`.
    pub fn save(
        &self,
        backend: &mut dyn StorageBackend,
        snapshot: &LayoutSnapshot,
    ) -> StorageResult<()> {
        let json = serde_json::to_string(snapshot)?;
        backend.save(&self.key, &json)?;
        tracing::trace!(target: "folio.storage", bytes = json.len(), "layout saved");
        Ok(())
    }

    /// Forget the stored layout.
    pub fn clear(&self, backend: &mut dyn StorageBackend) -> StorageResult<()> {
        backend.remove(&self.key)?;
        tracing::debug!(target: "folio.storage", key = %self.key, "layout cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::Size;
    use folio_layout::{LayoutEngine, PanelKey, ViewportClass};

    fn defaults() -> LayoutSnapshot {
        let engine = LayoutEngine::default();
        let viewport = Size::new(1440.0, 900.0);
        engine.default_snapshot(engine.classify(viewport), viewport)
    }

    #[test]
    fn memory_clones_share_entries() {
        let mut a = MemoryStorage::new();
        let b = a.clone();
        a.save("k", "v").unwrap();
        assert_eq!(b.load("k").unwrap().as_deref(), Some("v"));
        a.remove("k").unwrap();
        assert!(b.is_empty());
    }

    #[test]
    fn remove_missing_key_is_ok() {
        let mut s = MemoryStorage::new();
        assert!(s.remove("nothing").is_ok());
    }

    #[test]
    fn layout_round_trips_through_store() {
        let mut backend = MemoryStorage::new();
        let store = LayoutStore::default();
        let mut snap = defaults();
        snap.panels[PanelKey::About].active = true;
        store.save(&mut backend, &snap).unwrap();

        let loaded = store.load(&backend, &defaults()).unwrap();
        assert_eq!(loaded.snapshot, snap);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn malformed_layout_reads_as_absent() {
        let mut backend = MemoryStorage::new();
        backend.save(STORAGE_KEY, "{not json").unwrap();
        assert!(LayoutStore::default().load(&backend, &defaults()).is_none());
    }

    #[test]
    fn missing_layout_reads_as_absent() {
        let backend = MemoryStorage::new();
        assert!(LayoutStore::default().load(&backend, &defaults()).is_none());
    }

    #[test]
    fn clear_removes_only_layout_key() {
        let mut backend = MemoryStorage::new();
        backend.save("last_visit_date", "2026-01-01").unwrap();
        let store = LayoutStore::default();
        store.save(&mut backend, &defaults()).unwrap();
        store.clear(&mut backend).unwrap();
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn custom_key_is_respected() {
        let mut backend = MemoryStorage::new();
        let store = LayoutStore::new("alt");
        store.save(&mut backend, &defaults()).unwrap();
        assert!(backend.load("alt").unwrap().is_some());
        assert!(backend.load(STORAGE_KEY).unwrap().is_none());
        assert_eq!(
            store.load(&backend, &defaults()).unwrap().snapshot.viewport_class,
            ViewportClass::Large
        );
    }

    #[cfg(feature = "state-persistence")]
    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("folio.json");
        let mut a = FileStorage::new(&path);
        a.save("k", "v").unwrap();
        let b = FileStorage::new(&path);
        assert_eq!(b.load("k").unwrap().as_deref(), Some("v"));
        assert_eq!(b.path(), path.as_path());
    }

    #[cfg(feature = "state-persistence")]
    #[test]
    fn file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let s = FileStorage::new(dir.path().join("absent.json"));
        assert_eq!(s.load("k").unwrap(), None);
    }

    #[cfg(feature = "state-persistence")]
    #[test]
    fn file_storage_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"\x00garbage").unwrap();
        let mut s = FileStorage::new(&path);
        assert_eq!(s.load("k").unwrap(), None);
        s.save("k", "v").unwrap();
        assert_eq!(s.load("k").unwrap().as_deref(), Some("v"));
    }
}
