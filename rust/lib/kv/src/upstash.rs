use tracing::debug;

use crate::error::KVError;
use crate::traits::KVStore;

/// Message returned when the REST credentials are not configured.
pub const MISSING_CREDENTIALS: &str = "infrastructure error: KV credentials missing";

/// Connection settings for an Upstash-compatible REST key-value service.
#[derive(Debug, Clone, Default)]
pub struct UpstashConfig {
    pub url: Option<String>,
    pub token: Option<String>,
}

/// KVStore over the Upstash REST protocol:
///
/// - `GET {url}/get/{key}` answers `{"result": "<value>" | null}`
/// - `POST {url}/set/{key}` stores the request body as the value
///
/// Both carry `Authorization: Bearer {token}`. Calls block; use from
/// `spawn_blocking` inside a runtime.
pub struct UpstashStore {
    config: UpstashConfig,
}

impl UpstashStore {
    pub fn new(config: UpstashConfig) -> Self {
        Self { config }
    }

    /// Whether both URL and token are present.
    pub fn is_configured(&self) -> bool {
        self.credentials().is_ok()
    }

    fn credentials(&self) -> Result<(&str, &str), KVError> {
        let url = self.config.url.as_deref().filter(|s| !s.trim().is_empty());
        let token = self.config.token.as_deref().filter(|s| !s.trim().is_empty());
        match (url, token) {
            (Some(url), Some(token)) => Ok((url.trim_end_matches('/'), token)),
            _ => Err(KVError::Unavailable(MISSING_CREDENTIALS.into())),
        }
    }

    fn client(&self) -> Result<reqwest::blocking::Client, KVError> {
        reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| KVError::Storage(e.to_string()))
    }
}

fn check_status(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, KVError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().unwrap_or_default();
    Err(KVError::Remote {
        status: status.as_u16(),
        message,
    })
}

/// Decode the `result` field of a GET response into raw bytes.
///
/// The service normally returns the stored value as a string; a structured
/// JSON value is re-serialized.
fn decode_result(body: &serde_json::Value) -> Result<Option<Vec<u8>>, KVError> {
    match body.get("result") {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.as_bytes().to_vec())),
        Some(other) => serde_json::to_vec(other)
            .map(Some)
            .map_err(|e| KVError::Serialization(e.to_string())),
    }
}

impl KVStore for UpstashStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let (url, token) = self.credentials()?;
        debug!(key, "upstash get");

        let resp = self
            .client()?
            .get(format!("{}/get/{}", url, key))
            .bearer_auth(token)
            .send()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        let body: serde_json::Value = check_status(resp)?
            .json()
            .map_err(|e| KVError::Serialization(e.to_string()))?;
        decode_result(&body)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let (url, token) = self.credentials()?;
        debug!(key, bytes = value.len(), "upstash set");

        let resp = self
            .client()?
            .post(format!("{}/set/{}", url, key))
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(value.to_vec())
            .send()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        check_status(resp)?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "upstash"
    }
}
