//! Client-side key/value persistence for state that survives a reload.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;
use tracing::debug;

/// Serialized cart entries.
pub const CART_KEY: &str = "ementa_cart";
/// `"true"` or `"false"`.
pub const ADMIN_FLAG_KEY: &str = "ementa_is_admin";
/// Admin password override, plain text.
pub const ADMIN_PASSWORD_KEY: &str = "admin_password";
/// Catalog source URL override.
pub const API_URL_KEY: &str = "ementa_api_url";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// String-to-string storage with browser `localStorage` semantics.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Volatile storage. Starting a second app on the same shared instance
/// simulates a page reload.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Storage kept in a JSON object file, rewritten on every change.
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the file, starting empty if it is missing or unreadable.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let entries = match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                debug!(path = %path.display(), error = %e, "discarding unreadable storage file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
        })
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
            }
        }
        let text = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&self.path, text).map_err(|e| StorageError::Io(e.to_string()))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_set_get_remove() {
        let s = MemoryStorage::new();
        assert!(s.get_item(CART_KEY).is_none());
        s.set_item(CART_KEY, "[]").unwrap();
        assert_eq!(s.get_item(CART_KEY).as_deref(), Some("[]"));
        s.remove_item(CART_KEY).unwrap();
        assert!(s.get_item(CART_KEY).is_none());
    }

    #[test]
    fn file_storage_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state").join("storage.json");
        {
            let s = FileStorage::open(&path).unwrap();
            s.set_item(ADMIN_FLAG_KEY, "true").unwrap();
        }
        let s = FileStorage::open(&path).unwrap();
        assert_eq!(s.get_item(ADMIN_FLAG_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("storage.json");
        fs::write(&path, "not json").unwrap();
        let s = FileStorage::open(&path).unwrap();
        assert!(s.get_item(CART_KEY).is_none());
    }
}
