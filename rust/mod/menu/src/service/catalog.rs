use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use ementa_core::ServiceError;
use ementa_kv::{KVError, KVStore};

use crate::model::Catalog;

/// Key the catalog is stored under unless configured otherwise.
pub const DEFAULT_CATALOG_KEY: &str = "ementa:catalog";

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Backing store not configured.
    #[error("{0}")]
    Unavailable(String),

    #[error("storage: {0}")]
    Storage(String),

    /// Stored value is not a catalog.
    #[error("stored catalog is corrupt: {0}")]
    Corrupt(String),

    #[error("encode: {0}")]
    Encode(String),
}

impl From<KVError> for CatalogError {
    fn from(e: KVError) -> Self {
        match e {
            KVError::Unavailable(m) => CatalogError::Unavailable(m),
            other => CatalogError::Storage(other.to_string()),
        }
    }
}

impl From<CatalogError> for ServiceError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Unavailable(m) => ServiceError::Unavailable(m),
            CatalogError::Storage(m) => ServiceError::Storage(m),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

/// Reads and writes the whole catalog under one fixed key.
///
/// There is no versioning: the last successful `save` wins.
pub struct CatalogService {
    kv: Arc<dyn KVStore>,
    key: String,
}

impl CatalogService {
    pub fn new(kv: Arc<dyn KVStore>, key: impl Into<String>) -> Self {
        Self { kv, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored catalog, or None when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<Catalog>, CatalogError> {
        let Some(raw) = self.kv.get(&self.key)? else {
            debug!(key = %self.key, backend = self.kv.backend(), "no stored catalog");
            return Ok(None);
        };
        decode_catalog(&raw).map(Some)
    }

    pub fn save(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let dups = catalog.duplicate_item_ids();
        if !dups.is_empty() {
            warn!(ids = ?dups, "saving catalog with duplicate item ids");
        }
        let raw = serde_json::to_vec(catalog).map_err(|e| CatalogError::Encode(e.to_string()))?;
        self.kv.set(&self.key, &raw)?;
        info!(
            key = %self.key,
            backend = self.kv.backend(),
            categories = catalog.categories.len(),
            items = catalog.item_count(),
            "catalog saved"
        );
        Ok(())
    }
}

/// Accepts a JSON array, or a JSON string holding the array (some hosted
/// stores hand back the value double-encoded).
fn decode_catalog(raw: &[u8]) -> Result<Catalog, CatalogError> {
    let value: serde_json::Value =
        serde_json::from_slice(raw).map_err(|e| CatalogError::Corrupt(e.to_string()))?;
    let value = match value {
        serde_json::Value::String(inner) => {
            serde_json::from_str(&inner).map_err(|e| CatalogError::Corrupt(e.to_string()))?
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|e| CatalogError::Corrupt(e.to_string()))
}
