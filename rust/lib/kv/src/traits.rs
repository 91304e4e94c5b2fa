use crate::error::KVError;

/// KVStore provides a minimal key-value storage interface.
///
/// Keys are namespaced strings such as `ementa:catalog`. Values are opaque
/// bytes; callers own the encoding. Implementations are synchronous; async
/// callers go through `spawn_blocking`.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, overwriting any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Backend name, used in logs.
    fn backend(&self) -> &'static str;
}
