//! Key-value storage for the persisted cart snapshot.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::{Result, StorageError};

/// Storage key under which the cart snapshot lives.
pub const CART_STORAGE_KEY: &str = "mos_cart";

/// String-keyed, string-valued durable storage.
///
/// Implementations are synchronous: the cart never suspends on storage.
pub trait CartStorage {
    /// Returns the value stored under `key`, or `None` if the slot is empty.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process storage.
///
/// Clones share the same slots, so a second `CartStore` built from a clone
/// sees what the first one wrote (the same way a page reload sees what the
/// previous page left behind).
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage with one slot already filled.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut slots) = storage.slots.write() {
            slots.insert(key.into(), value.into());
        }
        storage
    }

    /// Returns the raw value of a slot.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.read().ok()?.get(key).cloned()
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.read().map_err(|_| StorageError::Poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.write().map_err(|_| StorageError::Poisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage keeping one `<key>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Uses `dir` for the slot files; the directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.slot_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_clones_share_slots() {
        let mut storage = MemoryStorage::new();
        let other = storage.clone();

        storage.write("k", "v").unwrap();

        assert_eq!(other.read("k").unwrap(), Some("v".to_string()));
        assert_eq!(other.read("missing").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_with_value() {
        let storage = MemoryStorage::with_value(CART_STORAGE_KEY, "[]");
        assert_eq!(storage.raw(CART_STORAGE_KEY), Some("[]".to_string()));
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.read(CART_STORAGE_KEY).unwrap(), None);

        storage.write(CART_STORAGE_KEY, "[1]").unwrap();
        storage.write(CART_STORAGE_KEY, "[2]").unwrap();

        assert_eq!(
            storage.read(CART_STORAGE_KEY).unwrap(),
            Some("[2]".to_string())
        );
        assert!(storage.dir().join("mos_cart.json").exists());
    }
}
