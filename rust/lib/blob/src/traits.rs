use crate::error::BlobError;

/// BlobStore holds uploaded images.
///
/// Keys are path-like strings such as `menu/p-margherita.jpg`. The default
/// implementation (`FileStore`) maps keys to local filesystem paths; a
/// hosted object store can be swapped in by implementing this trait.
pub trait BlobStore: Send + Sync {
    /// Store a blob. Overwrites if the key already exists.
    fn put(&self, key: &str, data: &[u8]) -> Result<(), BlobError>;

    /// Retrieve a blob. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;
}
