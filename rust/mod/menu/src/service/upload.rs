use std::sync::Arc;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use ementa_blob::{BlobError, BlobStore};
use ementa_core::{new_id, ServiceError};

/// Content types an upload token may be used for.
pub const ALLOWED_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Payload attached to every issued token and echoed back on completion.
pub const DEFAULT_TOKEN_PAYLOAD: &str = r#"{"userId":"admin"}"#;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid pathname: {0}")]
    InvalidPathname(String),

    #[error("content type not allowed: {0}")]
    ContentType(String),

    #[error("invalid upload token: {0}")]
    Token(String),

    #[error("malformed upload event: {0}")]
    Event(String),

    #[error("storage: {0}")]
    Storage(String),
}

impl From<BlobError> for UploadError {
    fn from(e: BlobError) -> Self {
        match e {
            BlobError::InvalidKey(k) => UploadError::InvalidPathname(k),
            other => UploadError::Storage(other.to_string()),
        }
    }
}

impl From<UploadError> for ServiceError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Token(_) => ServiceError::Unauthorized(e.to_string()),
            UploadError::Storage(m) => ServiceError::Storage(m),
            other => ServiceError::Validation(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// HS256 signing secret for client tokens.
    pub secret: String,
    /// Client token lifetime in seconds.
    pub token_ttl: i64,
    /// Prefix for returned URLs; empty yields site-relative `/blob/...`.
    pub public_base_url: String,
    /// Largest accepted upload body in bytes.
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            secret: "ementa-dev-upload-secret-change-me".to_string(),
            token_ttl: 3600,
            public_base_url: String::new(),
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Claims of a client upload token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadClaims {
    pub pathname: String,
    pub allowed_content_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_payload: Option<String>,
    /// Token id, logged on issue and on use.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Result of a direct upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBlob {
    pub url: String,
    pub pathname: String,
    pub content_type: String,
}

/// Events posted to the upload handshake endpoint.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum UploadEvent {
    #[serde(rename = "blob.generate-client-token")]
    GenerateClientToken {
        pathname: String,
        #[serde(default, rename = "clientPayload")]
        client_payload: Option<String>,
    },

    #[serde(rename = "blob.upload-completed")]
    UploadCompleted {
        blob: StoredBlob,
        #[serde(default, rename = "tokenPayload")]
        token_payload: Option<String>,
    },
}

/// Issues scoped client tokens and accepts the direct uploads they allow.
pub struct UploadBroker {
    blobs: Arc<dyn BlobStore>,
    config: UploadConfig,
}

impl UploadBroker {
    pub fn new(blobs: Arc<dyn BlobStore>, config: UploadConfig) -> Self {
        Self { blobs, config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Answer a handshake event with the JSON body to send back.
    pub fn handle_event(&self, event: UploadEvent) -> Result<serde_json::Value, UploadError> {
        match event {
            UploadEvent::GenerateClientToken { pathname, client_payload } => {
                if let Some(payload) = &client_payload {
                    debug!(pathname = %pathname, client_payload = %payload, "token requested");
                }
                let token = self.issue_token(&pathname)?;
                Ok(serde_json::json!({
                    "type": "blob.generate-client-token",
                    "clientToken": token,
                }))
            }
            UploadEvent::UploadCompleted { blob, token_payload } => {
                info!(
                    url = %blob.url,
                    pathname = %blob.pathname,
                    token_payload = token_payload.as_deref().unwrap_or(""),
                    "upload completed"
                );
                Ok(serde_json::json!({
                    "type": "blob.upload-completed",
                    "response": "ok",
                }))
            }
        }
    }

    /// Sign a token allowing one image upload to `pathname`.
    pub fn issue_token(&self, pathname: &str) -> Result<String, UploadError> {
        validate_pathname(pathname)?;
        let now = chrono::Utc::now().timestamp();
        let claims = UploadClaims {
            pathname: pathname.to_string(),
            allowed_content_types: ALLOWED_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
            token_payload: Some(DEFAULT_TOKEN_PAYLOAD.to_string()),
            jti: new_id(),
            iat: now,
            exp: now + self.config.token_ttl,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| UploadError::Token(format!("encode failed: {}", e)))?;
        debug!(pathname, token_id = %claims.jti, "upload token issued");
        Ok(token)
    }

    /// Check signature, expiry and that the token was issued for `pathname`.
    pub fn verify_token(&self, token: &str, pathname: &str) -> Result<UploadClaims, UploadError> {
        let data = decode::<UploadClaims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| UploadError::Token(e.to_string()))?;

        if data.claims.pathname != pathname {
            return Err(UploadError::Token(format!(
                "token issued for {:?}, not {:?}",
                data.claims.pathname, pathname
            )));
        }
        Ok(data.claims)
    }

    /// Store an upload authorized by `token` and return its public URL.
    pub fn store(
        &self,
        token: &str,
        pathname: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<StoredBlob, UploadError> {
        let claims = self.verify_token(token, pathname)?;
        let content_type = normalize_content_type(content_type);
        if !claims.allowed_content_types.iter().any(|c| c == &content_type) {
            warn!(pathname, content_type = %content_type, "rejected upload");
            return Err(UploadError::ContentType(content_type));
        }
        if data.is_empty() {
            return Err(UploadError::Event("empty upload body".into()));
        }

        self.blobs.put(pathname, data)?;
        info!(pathname, bytes = data.len(), token_id = %claims.jti, "image stored");

        Ok(StoredBlob {
            url: self.public_url(pathname),
            pathname: pathname.to_string(),
            content_type,
        })
    }

    /// Stored bytes and their content type, inferred from the extension.
    pub fn fetch(&self, pathname: &str) -> Result<Option<(Vec<u8>, &'static str)>, UploadError> {
        let data = self.blobs.get(pathname)?;
        Ok(data.map(|bytes| (bytes, content_type_for(pathname))))
    }

    pub fn public_url(&self, pathname: &str) -> String {
        format!("{}/blob/{}", self.config.public_base_url.trim_end_matches('/'), pathname)
    }
}

fn validate_pathname(pathname: &str) -> Result<(), UploadError> {
    let bad = pathname.is_empty()
        || pathname.starts_with('/')
        || pathname.contains('\\')
        || pathname.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(UploadError::InvalidPathname(pathname.to_string()));
    }
    Ok(())
}

/// Lowercase and drop parameters (`image/PNG; charset=x` → `image/png`).
fn normalize_content_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

fn content_type_for(pathname: &str) -> &'static str {
    let ext = pathname.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ementa_blob::FileStore;
    use tempfile::TempDir;

    fn broker() -> (TempDir, UploadBroker) {
        let tmp = TempDir::new().unwrap();
        let blobs = Arc::new(FileStore::open(&tmp.path().join("blobs")).unwrap());
        (tmp, UploadBroker::new(blobs, UploadConfig::default()))
    }

    #[test]
    fn issued_token_allows_images_only() {
        let (_tmp, broker) = broker();
        let token = broker.issue_token("menu/p1.png").unwrap();
        let claims = broker.verify_token(&token, "menu/p1.png").unwrap();
        assert_eq!(claims.allowed_content_types, ALLOWED_CONTENT_TYPES);
        assert_eq!(claims.token_payload.as_deref(), Some(DEFAULT_TOKEN_PAYLOAD));
        assert!(claims.exp > claims.iat);

        let again = broker.issue_token("menu/p1.png").unwrap();
        let other = broker.verify_token(&again, "menu/p1.png").unwrap();
        assert_eq!(claims.jti.len(), 32);
        assert_ne!(claims.jti, other.jti);
    }

    #[test]
    fn store_and_fetch() {
        let (_tmp, broker) = broker();
        let token = broker.issue_token("menu/p1.png").unwrap();
        let blob = broker.store(&token, "menu/p1.png", "image/PNG", b"\x89PNG").unwrap();
        assert_eq!(blob.url, "/blob/menu/p1.png");
        assert_eq!(blob.content_type, "image/png");

        let (bytes, ct) = broker.fetch("menu/p1.png").unwrap().unwrap();
        assert_eq!(bytes, b"\x89PNG");
        assert_eq!(ct, "image/png");
        assert!(broker.fetch("menu/none.png").unwrap().is_none());
    }

    #[test]
    fn rejects_disallowed_content_type() {
        let (_tmp, broker) = broker();
        let token = broker.issue_token("menu/x.svg").unwrap();
        let err = broker.store(&token, "menu/x.svg", "image/svg+xml", b"<svg/>").unwrap_err();
        assert!(matches!(err, UploadError::ContentType(_)));
    }

    #[test]
    fn rejects_mismatched_pathname() {
        let (_tmp, broker) = broker();
        let token = broker.issue_token("menu/a.jpg").unwrap();
        let err = broker.store(&token, "menu/b.jpg", "image/jpeg", b"x").unwrap_err();
        assert!(matches!(err, UploadError::Token(_)));
    }

    #[test]
    fn rejects_forged_token() {
        let (_tmp, broker) = broker();
        let other = UploadBroker::new(
            broker.blobs.clone(),
            UploadConfig { secret: "another-secret".into(), ..Default::default() },
        );
        let forged = other.issue_token("menu/a.jpg").unwrap();
        assert!(matches!(broker.verify_token(&forged, "menu/a.jpg"), Err(UploadError::Token(_))));
        assert!(matches!(broker.verify_token("garbage", "menu/a.jpg"), Err(UploadError::Token(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let (_tmp, broker) = broker();
        let expired = UploadBroker::new(
            broker.blobs.clone(),
            UploadConfig { token_ttl: -3600, ..Default::default() },
        );
        let token = expired.issue_token("menu/a.jpg").unwrap();
        assert!(matches!(broker.verify_token(&token, "menu/a.jpg"), Err(UploadError::Token(_))));
    }

    #[test]
    fn rejects_bad_pathnames() {
        let (_tmp, broker) = broker();
        for p in ["", "/abs.jpg", "a/../b.jpg", "a//b.jpg", "a\\b.jpg"] {
            assert!(matches!(broker.issue_token(p), Err(UploadError::InvalidPathname(_))), "{:?}", p);
        }
    }

    #[test]
    fn handshake_events() {
        let (_tmp, broker) = broker();
        let event: UploadEvent = serde_json::from_value(serde_json::json!({
            "type": "blob.generate-client-token",
            "payload": {"pathname": "menu/p.webp"}
        }))
        .unwrap();
        let resp = broker.handle_event(event).unwrap();
        assert_eq!(resp["type"], "blob.generate-client-token");
        let token = resp["clientToken"].as_str().unwrap();
        assert!(broker.verify_token(token, "menu/p.webp").is_ok());

        let event: UploadEvent = serde_json::from_value(serde_json::json!({
            "type": "blob.upload-completed",
            "payload": {
                "blob": {"url": "/blob/menu/p.webp", "pathname": "menu/p.webp", "contentType": "image/webp"},
                "tokenPayload": DEFAULT_TOKEN_PAYLOAD
            }
        }))
        .unwrap();
        let resp = broker.handle_event(event).unwrap();
        assert_eq!(resp["response"], "ok");
    }

    #[test]
    fn errors_map_to_http_status() {
        use axum::http::StatusCode;
        let s = |e: UploadError| ServiceError::from(e).status_code();
        assert_eq!(s(UploadError::Token("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(s(UploadError::ContentType("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(s(UploadError::Storage("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
