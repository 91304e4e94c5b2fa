use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use tracing::warn;

use ementa_core::ServiceError;

use crate::api::{blocking, AppState, PERM_CATALOG_WRITE};
use crate::model::Catalog;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/menu",
        get(get_menu).post(save_menu).options(preflight),
    )
}

/// GET /api/menu → `{"menu": [...] | null}`
async fn get_menu(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ServiceError> {
    let svc = state.catalog.clone();
    let catalog = blocking(move || svc.load()).await?;
    Ok(Json(serde_json::json!({ "menu": catalog })))
}

/// POST /api/menu with the full catalog as body → `{"success": true}`
async fn save_menu(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ServiceError> {
    state.auth.check(&headers, PERM_CATALOG_WRITE)?;

    let catalog: Catalog = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "rejected catalog body");
        ServiceError::Validation(format!("body is not a catalog: {}", e))
    })?;

    let svc = state.catalog.clone();
    blocking(move || svc.save(&catalog)).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use ementa_blob::FileStore;
    use ementa_core::{AllowAll, Authenticator, BearerSecret, DenyAll};
    use ementa_kv::{KVStore, RedbStore, UpstashConfig, UpstashStore};

    use crate::api::{build_router, MenuState};
    use crate::data::default_catalog;
    use crate::service::{CatalogService, UploadBroker, UploadConfig, DEFAULT_CATALOG_KEY};

    fn router_with(kv: Arc<dyn KVStore>, auth: Arc<dyn Authenticator>, tmp: &TempDir) -> Router {
        let blobs = Arc::new(FileStore::open(&tmp.path().join("blobs")).unwrap());
        build_router(Arc::new(MenuState {
            catalog: Arc::new(CatalogService::new(kv, DEFAULT_CATALOG_KEY)),
            uploads: Arc::new(UploadBroker::new(blobs, UploadConfig::default())),
            auth,
        }))
    }

    fn redb_router(tmp: &TempDir, auth: Arc<dyn Authenticator>) -> Router {
        let kv = Arc::new(RedbStore::open(&tmp.path().join("data.redb")).unwrap());
        router_with(kv, auth, tmp)
    }

    async fn call(
        router: &Router,
        method: &str,
        body: Option<String>,
        bearer: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri("/api/menu");
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let req = builder.body(body.map(Body::from).unwrap_or_else(Body::empty)).unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::json!(null)
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::json!(null))
        };
        (status, json)
    }

    #[tokio::test]
    async fn empty_store_returns_null_menu() {
        let tmp = TempDir::new().unwrap();
        let router = redb_router(&tmp, Arc::new(AllowAll));
        let (status, body) = call(&router, "GET", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["menu"].is_null());
    }

    #[tokio::test]
    async fn post_then_get_round_trips() {
        let tmp = TempDir::new().unwrap();
        let router = redb_router(&tmp, Arc::new(AllowAll));
        let catalog = default_catalog().unwrap();

        let (status, body) =
            call(&router, "POST", Some(serde_json::to_string(&catalog).unwrap()), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, body) = call(&router, "GET", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let back: crate::model::Catalog = serde_json::from_value(body["menu"].clone()).unwrap();
        assert_eq!(back, catalog);
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let tmp = TempDir::new().unwrap();
        let router = redb_router(&tmp, Arc::new(AllowAll));
        let (status, body) = call(&router, "POST", Some("{\"menu\": 1}".into()), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("not a catalog"));
    }

    #[tokio::test]
    async fn missing_credentials_is_500_with_error() {
        let tmp = TempDir::new().unwrap();
        let kv = Arc::new(UpstashStore::new(UpstashConfig::default()));
        let router = router_with(kv, Arc::new(AllowAll), &tmp);

        let (status, body) = call(&router, "GET", None, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("credentials"));

        let (status, _) = call(&router, "POST", Some("[]".into()), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn options_is_200_with_cors() {
        let tmp = TempDir::new().unwrap();
        let router = redb_router(&tmp, Arc::new(AllowAll));

        let (status, _) = call(&router, "OPTIONS", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/menu")
            .header("origin", "https://example.com")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        let methods = resp.headers()["access-control-allow-methods"].to_str().unwrap();
        assert!(methods.contains("POST"));
    }

    #[tokio::test]
    async fn write_token_guards_post() {
        let tmp = TempDir::new().unwrap();
        let router = redb_router(&tmp, Arc::new(BearerSecret::new("kitchen")));

        let (status, body) = call(&router, "POST", Some("[]".into()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");

        let (status, _) = call(&router, "POST", Some("[]".into()), Some("wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(&router, "POST", Some("[]".into()), Some("kitchen")).await;
        assert_eq!(status, StatusCode::OK);

        // Reads stay open.
        let (status, body) = call(&router, "GET", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["menu"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn read_only_refuses_writes_but_serves_reads() {
        let tmp = TempDir::new().unwrap();
        let router = redb_router(&tmp, Arc::new(DenyAll));

        let (status, body) = call(&router, "POST", Some("[]".into()), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "PERMISSION_DENIED");
        assert!(body["error"].as_str().unwrap().contains("menu:catalog:write"));

        let (status, body) = call(&router, "GET", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["menu"].is_null());
    }
}
