pub mod catalog;
pub mod upload;

pub use catalog::{CatalogError, CatalogService, DEFAULT_CATALOG_KEY};
pub use upload::{
    StoredBlob, UploadBroker, UploadClaims, UploadConfig, UploadError, UploadEvent,
    ALLOWED_CONTENT_TYPES,
};
