use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};

use ementa_core::ServiceError;

use crate::api::{blocking, AppState, PERM_IMAGE_UPLOAD};
use crate::service::{StoredBlob, UploadError, UploadEvent};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/upload", post(handle_upload).options(preflight))
        .route("/blob/{*pathname}", get(get_blob).put(put_blob))
}

/// POST /api/upload: token handshake and completion callback.
///
/// Every failure here answers `400 {"error": ...}`.
async fn handle_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let event: UploadEvent = serde_json::from_slice(&body)
        .map_err(|e| ServiceError::Validation(UploadError::Event(e.to_string()).to_string()))?;

    if matches!(event, UploadEvent::GenerateClientToken { .. }) {
        state.auth.check(&headers, PERM_IMAGE_UPLOAD)?;
    }

    let resp = state
        .uploads
        .handle_event(event)
        .map_err(|e| ServiceError::Validation(e.to_string()))?;
    Ok(Json(resp))
}

/// PUT /blob/{pathname} with `Authorization: Bearer <clientToken>`.
async fn put_blob(
    State(state): State<AppState>,
    Path(pathname): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<StoredBlob>, ServiceError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .ok_or_else(|| ServiceError::Unauthorized("missing upload token".into()))?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let uploads = state.uploads.clone();
    let blob = blocking(move || uploads.store(&token, &pathname, &content_type, &body)).await?;
    Ok(Json(blob))
}

/// GET /blob/{pathname} serves a stored image.
async fn get_blob(
    State(state): State<AppState>,
    Path(pathname): Path<String>,
) -> Result<Response, ServiceError> {
    let uploads = state.uploads.clone();
    let lookup = pathname.clone();
    let found = blocking(move || uploads.fetch(&lookup)).await?;
    let (bytes, content_type) =
        found.ok_or_else(|| ServiceError::NotFound(format!("blob not found: {}", pathname)))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(Body::from(bytes))
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}
