//! Request authentication for write endpoints.
//!
//! Modules only know this trait. The concrete implementation is chosen
//! at startup from configuration.

use axum::http::HeaderMap;

use crate::ServiceError;

/// Pluggable authenticator. Called by handlers that mutate state.
///
/// - `headers`: the HTTP request headers
/// - `permission`: an action name such as `menu:catalog:write`
/// - Returns `Ok(())` if allowed, `Err(ServiceError)` if denied.
pub trait Authenticator: Send + Sync + 'static {
    fn check(&self, headers: &HeaderMap, permission: &str) -> Result<(), ServiceError>;
}

/// Allows everything. Used when no write token is configured.
pub struct AllowAll;

impl Authenticator for AllowAll {
    fn check(&self, _headers: &HeaderMap, _permission: &str) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Denies every write. Backs a read-only deployment.
pub struct DenyAll;

impl Authenticator for DenyAll {
    fn check(&self, _headers: &HeaderMap, permission: &str) -> Result<(), ServiceError> {
        Err(ServiceError::PermissionDenied(format!("{} denied", permission)))
    }
}

/// Compares `Authorization: Bearer <token>` against a shared secret.
pub struct BearerSecret {
    secret: String,
}

impl BearerSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }
}

impl Authenticator for BearerSecret {
    fn check(&self, headers: &HeaderMap, permission: &str) -> Result<(), ServiceError> {
        let token = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ServiceError::Unauthorized("missing bearer token".into()))?;

        if !constant_time_eq(token.trim().as_bytes(), self.secret.as_bytes()) {
            return Err(ServiceError::Unauthorized(format!(
                "{} denied: invalid token",
                permission
            )));
        }
        Ok(())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    fn with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn allow_all_allows() {
        assert!(AllowAll.check(&HeaderMap::new(), "menu:catalog:write").is_ok());
    }

    #[test]
    fn deny_all_denies_with_403() {
        let err = DenyAll.check(&HeaderMap::new(), "menu:catalog:write").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn bearer_secret_accepts_matching_token() {
        let auth = BearerSecret::new("s3cret");
        assert!(auth.check(&with_auth("Bearer s3cret"), "w").is_ok());
    }

    #[test]
    fn bearer_secret_rejects_missing_header() {
        let auth = BearerSecret::new("s3cret");
        let err = auth.check(&HeaderMap::new(), "w").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn bearer_secret_rejects_wrong_token() {
        let auth = BearerSecret::new("s3cret");
        let err = auth.check(&with_auth("Bearer nope"), "w").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        let err = auth.check(&with_auth("Basic s3cret"), "w").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
