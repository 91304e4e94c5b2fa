//! Network collaborators of the storefront: the catalog endpoint and the
//! image upload handshake.

use serde::Deserialize;
use tracing::{debug, info};

use ementa_menu::Catalog;

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Where the catalog override lives.
#[async_trait::async_trait]
pub trait CatalogRemote: Send + Sync {
    /// Stored catalog, or None when the remote has none.
    async fn fetch(&self) -> Result<Option<Catalog>, ApiError>;

    /// Overwrite the stored catalog in one write.
    async fn store(&self, catalog: &Catalog) -> Result<(), ApiError>;
}

/// Uploads an image and returns the URL to put in the item.
#[async_trait::async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(
        &self,
        pathname: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ApiError>;
}

/// Map non-success responses to `ApiError::Server`, keeping the server's
/// `error` message when the body carries one.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or(body);
    Err(ApiError::Server { status: status.as_u16(), message })
}

async fn parse<R: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
    check(resp)
        .await?
        .json::<R>()
        .await
        .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
}

fn authed(builder: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
    match token {
        Some(t) => builder.bearer_auth(t),
        None => builder,
    }
}

/// `{base_url}/blob/{pathname}`, each pathname segment percent-encoded so
/// the request path decodes back to exactly `pathname`.
fn blob_url(base_url: &str, pathname: &str) -> Result<reqwest::Url, ApiError> {
    let mut url =
        reqwest::Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidUrl(format!("{}: cannot be a base", base_url)))?
        .pop_if_empty()
        .push("blob")
        .extend(pathname.split('/'));
    Ok(url)
}

#[derive(Deserialize)]
struct MenuResponse {
    menu: Option<Catalog>,
}

/// HTTP client for `/api/menu`.
pub struct MenuClient {
    http: reqwest::Client,
    base_url: String,
    write_token: Option<String>,
}

impl MenuClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            write_token: None,
        }
    }

    /// Bearer token sent with writes when the server requires one.
    pub fn with_write_token(mut self, token: impl Into<String>) -> Self {
        self.write_token = Some(token.into());
        self
    }

    fn url(&self) -> String {
        format!("{}/api/menu", self.base_url)
    }
}

#[async_trait::async_trait]
impl CatalogRemote for MenuClient {
    async fn fetch(&self) -> Result<Option<Catalog>, ApiError> {
        let resp = self.http.get(self.url()).send().await?;
        let body: MenuResponse = parse(resp).await?;
        debug!(found = body.menu.is_some(), "fetched catalog");
        Ok(body.menu)
    }

    async fn store(&self, catalog: &Catalog) -> Result<(), ApiError> {
        let req = authed(self.http.post(self.url()).json(catalog), self.write_token.as_deref());
        check(req.send().await?).await?;
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    client_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlobResponse {
    url: String,
    pathname: String,
    content_type: String,
}

/// Three-step upload: request a client token, PUT the bytes, report
/// completion.
pub struct UploadClient {
    http: reqwest::Client,
    base_url: String,
    write_token: Option<String>,
}

impl UploadClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            write_token: None,
        }
    }

    pub fn with_write_token(mut self, token: impl Into<String>) -> Self {
        self.write_token = Some(token.into());
        self
    }
}

#[async_trait::async_trait]
impl ImageUploader for UploadClient {
    async fn upload(
        &self,
        pathname: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ApiError> {
        let handshake = format!("{}/api/upload", self.base_url);

        let req = self.http.post(&handshake).json(&serde_json::json!({
            "type": "blob.generate-client-token",
            "payload": { "pathname": pathname },
        }));
        let token: TokenResponse =
            parse(authed(req, self.write_token.as_deref()).send().await?).await?;

        let resp = self
            .http
            .put(blob_url(&self.base_url, pathname)?)
            .bearer_auth(&token.client_token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        let blob: BlobResponse = parse(resp).await?;

        let done = self.http.post(&handshake).json(&serde_json::json!({
            "type": "blob.upload-completed",
            "payload": {
                "blob": {
                    "url": blob.url,
                    "pathname": blob.pathname,
                    "contentType": blob.content_type,
                },
            },
        }));
        check(done.send().await?).await?;

        info!(url = %blob.url, "image uploaded");
        Ok(blob.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = MenuClient::new("http://localhost:8080/");
        assert_eq!(client.url(), "http://localhost:8080/api/menu");
    }

    #[test]
    fn blob_url_encodes_each_segment() {
        let url = blob_url("http://localhost:8080", "menus/pizza fenicia #1?.jpg").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/blob/menus/pizza%20fenicia%20%231%3F.jpg");

        let url = blob_url("https://menu.example/ementa", "p1.png").unwrap();
        assert_eq!(url.as_str(), "https://menu.example/ementa/blob/p1.png");
    }

    #[test]
    fn blob_url_rejects_garbage_base() {
        assert!(matches!(blob_url("not a url", "p1.png"), Err(ApiError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let client = MenuClient::new("http://127.0.0.1:9");
        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
