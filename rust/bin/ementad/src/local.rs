//! The storefront's collaborators when it runs inside the server: the
//! catalog service and upload broker themselves, without an HTTP hop.

use std::sync::Arc;

use ementa_core::ServiceError;
use ementa_menu::service::{CatalogService, UploadBroker, UploadError};
use ementa_menu::Catalog;
use ementa_storefront::{ApiError, CatalogRemote, ImageUploader, MenuClient, UploadClient};

/// Where a visitor's catalog comes from and goes to: this server, or the
/// one named by their API URL setting.
pub fn catalog_source(service: &Arc<CatalogService>, api_url: Option<String>) -> Box<dyn CatalogRemote> {
    match api_url {
        Some(url) => Box::new(MenuClient::new(url)),
        None => Box::new(StoredCatalog::new(service.clone())),
    }
}

/// Where a visitor's image uploads go; same rule as [`catalog_source`].
pub fn image_target(broker: &Arc<UploadBroker>, api_url: Option<String>) -> Box<dyn ImageUploader> {
    match api_url {
        Some(url) => Box::new(UploadClient::new(url)),
        None => Box::new(StoredImages::new(broker.clone())),
    }
}

pub struct StoredCatalog {
    service: Arc<CatalogService>,
}

impl StoredCatalog {
    pub fn new(service: Arc<CatalogService>) -> Self {
        Self { service }
    }
}

fn internal(message: impl ToString) -> ApiError {
    ApiError::Server { status: 500, message: message.to_string() }
}

#[async_trait::async_trait]
impl CatalogRemote for StoredCatalog {
    async fn fetch(&self) -> Result<Option<Catalog>, ApiError> {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || service.load())
            .await
            .map_err(internal)?
            .map_err(internal)
    }

    async fn store(&self, catalog: &Catalog) -> Result<(), ApiError> {
        let service = self.service.clone();
        let catalog = catalog.clone();
        tokio::task::spawn_blocking(move || service.save(&catalog))
            .await
            .map_err(internal)?
            .map_err(internal)
    }
}

/// Issues a token and stores the bytes in one step, the way the upload
/// handshake does over HTTP.
pub struct StoredImages {
    broker: Arc<UploadBroker>,
}

impl StoredImages {
    pub fn new(broker: Arc<UploadBroker>) -> Self {
        Self { broker }
    }
}

fn rejected(e: UploadError) -> ApiError {
    let err = ServiceError::from(e);
    ApiError::Server { status: err.status_code().as_u16(), message: err.to_string() }
}

#[async_trait::async_trait]
impl ImageUploader for StoredImages {
    async fn upload(&self, pathname: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ApiError> {
        let broker = self.broker.clone();
        let pathname = pathname.to_string();
        let content_type = content_type.to_string();
        tokio::task::spawn_blocking(move || {
            let token = broker.issue_token(&pathname)?;
            let blob = broker.store(&token, &pathname, &content_type, &bytes)?;
            Ok::<_, UploadError>(blob.url)
        })
        .await
        .map_err(internal)?
        .map_err(rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ementa_blob::FileStore;
    use ementa_kv::{MemoryStore, UpstashConfig, UpstashStore};
    use ementa_menu::data::default_catalog;
    use ementa_menu::service::UploadConfig;

    fn broker(tmp: &tempfile::TempDir) -> Arc<UploadBroker> {
        let blobs = Arc::new(FileStore::open(tmp.path()).unwrap());
        Arc::new(UploadBroker::new(blobs, UploadConfig::default()))
    }

    #[tokio::test]
    async fn stored_images_land_in_the_blob_store() {
        let tmp = tempfile::TempDir::new().unwrap();
        let broker = broker(&tmp);
        let images = StoredImages::new(broker.clone());

        let url = images.upload("pizza.png", b"png-bytes".to_vec(), "image/png").await.unwrap();
        assert!(url.ends_with("/blob/pizza.png"));
        let (bytes, content_type) = broker.fetch("pizza.png").unwrap().unwrap();
        assert_eq!(bytes, b"png-bytes");
        assert_eq!(content_type, "image/png");
    }

    #[tokio::test]
    async fn disallowed_type_is_a_client_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let images = StoredImages::new(broker(&tmp));
        match images.upload("menu.pdf", vec![1], "application/pdf").await {
            Err(ApiError::Server { status, .. }) => assert_eq!(status, 400),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn round_trips_through_the_service() {
        let service = Arc::new(CatalogService::new(Arc::new(MemoryStore::new()), "test:catalog"));
        let source = StoredCatalog::new(service);
        assert!(source.fetch().await.unwrap().is_none());

        let catalog = default_catalog().unwrap();
        source.store(&catalog).await.unwrap();
        assert_eq!(source.fetch().await.unwrap(), Some(catalog));
    }

    #[tokio::test]
    async fn unavailable_store_is_a_server_error() {
        let kv = Arc::new(UpstashStore::new(UpstashConfig::default()));
        let source = StoredCatalog::new(Arc::new(CatalogService::new(kv, "k")));
        match source.fetch().await {
            Err(ApiError::Server { status, message }) => {
                assert_eq!(status, 500);
                assert!(message.contains("KV credentials missing"));
            }
            other => panic!("unexpected: {:?}", other.map(|c| c.is_some())),
        }
    }
}
