use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Stable codes sent next to every error message.
///
/// The storefront shows `error` to the admin as-is and branches on `code`.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const UNAVAILABLE: &str = "UNAVAILABLE";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error returned by every HTTP handler.
///
/// Renders as `{"error": "<message>", "code": "<CODE>"}`, e.g.
///
/// ```json
/// {"error": "infrastructure error: KV credentials missing", "code": "UNAVAILABLE"}
/// ```
#[derive(Error, Debug)]
pub enum ServiceError {
    /// 404
    #[error("{0}")]
    NotFound(String),

    /// 400. Body or query could not be used.
    #[error("{0}")]
    Validation(String),

    /// 401. No usable bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// 403
    #[error("{0}")]
    PermissionDenied(String),

    /// 500. A backing service is not configured.
    #[error("{0}")]
    Unavailable(String),

    /// 500. The backing service failed.
    #[error("{0}")]
    Storage(String),

    /// 500
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    fn parts(&self) -> (StatusCode, &'static str) {
        use error_code::*;
        match self {
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, NOT_FOUND),
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, VALIDATION_FAILED),
            ServiceError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, UNAUTHENTICATED),
            ServiceError::PermissionDenied(_) => (StatusCode::FORBIDDEN, PERMISSION_DENIED),
            ServiceError::Unavailable(_) => (StatusCode::INTERNAL_SERVER_ERROR, UNAVAILABLE),
            ServiceError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, STORAGE_ERROR),
            ServiceError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL),
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.parts().1
    }

    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "request failed");
        }
        let body = serde_json::json!({
            "error": self.to_string(),
            "code": code,
        });
        (status, axum::Json(body)).into_response()
    }
}
