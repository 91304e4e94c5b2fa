mod menu;
mod upload;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use ementa_core::{Authenticator, ServiceError};

use crate::service::{CatalogService, UploadBroker};

/// Permission checked before the catalog is overwritten.
pub const PERM_CATALOG_WRITE: &str = "menu:catalog:write";
/// Permission checked before an upload token is issued.
pub const PERM_IMAGE_UPLOAD: &str = "menu:image:upload";

pub struct MenuState {
    pub catalog: Arc<CatalogService>,
    pub uploads: Arc<UploadBroker>,
    pub auth: Arc<dyn Authenticator>,
}

/// Shared handler state.
pub type AppState = Arc<MenuState>;

/// Build the menu API router: `/api/menu`, `/api/upload` and `/blob/*`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(menu::routes())
        .merge(upload::routes())
        .layer(DefaultBodyLimit::max(state.uploads.config().max_bytes))
        .layer(cors_layer())
        .with_state(state)
}

/// Any origin, `GET, POST, OPTIONS` (plus `PUT` for direct uploads),
/// `Content-Type` and `Authorization` headers.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Run a synchronous storage call off the async runtime.
async fn blocking<T, E, F>(f: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Internal(format!("worker failed: {}", e)))?
        .map_err(Into::into)
}
