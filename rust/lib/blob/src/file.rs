use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::BlobError;
use crate::traits::BlobStore;

/// FileStore is a BlobStore backed by the local filesystem.
///
/// Key `menu/p1.jpg` maps to `{base_dir}/menu/p1.jpg`. Parent directories
/// are created on `put`.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a FileStore rooted at `base_dir`, creating the directory.
    pub fn open(base_dir: &Path) -> Result<Self, BlobError> {
        fs::create_dir_all(base_dir).map_err(|e| BlobError::Io(e.to_string()))?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
        })
    }

    /// Map a key to a path under base_dir. Only plain relative components
    /// are accepted, so a key can never escape the root.
    fn resolve(&self, key: &str) -> Result<PathBuf, BlobError> {
        if key.is_empty() || key.contains('\\') {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        let rel = Path::new(key);
        let plain = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        Ok(self.base_dir.join(rel))
    }
}

impl BlobStore for FileStore {
    fn put(&self, key: &str, data: &[u8]) -> Result<(), BlobError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BlobError::Io(e.to_string()))?;
        }
        fs::write(&path, data).map_err(|e| BlobError::Io(e.to_string()))?;
        debug!(key, bytes = data.len(), "blob stored");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.resolve(key)?;
        if !path.is_file() {
            return Ok(None);
        }
        let data = fs::read(&path).map_err(|e| BlobError::Io(e.to_string()))?;
        Ok(Some(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn put_and_get() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(&tmp.path().join("blobs")).unwrap();

        store.put("menu/p1.jpg", b"\xff\xd8jpeg").unwrap();
        assert_eq!(store.get("menu/p1.jpg").unwrap().unwrap(), b"\xff\xd8jpeg");
        assert!(tmp.path().join("blobs/menu/p1.jpg").is_file());
    }

    #[test]
    fn missing_blob_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        assert!(store.get("menu/none.png").unwrap().is_none());
    }

    #[test]
    fn rejects_traversal_and_absolute_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();

        for key in ["", "/etc/passwd", "../escape.jpg", "menu/../../x.jpg", "a\\b.png", "./p.jpg"] {
            assert!(
                matches!(store.put(key, b"x"), Err(BlobError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }
}
