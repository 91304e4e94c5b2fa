//! Server configuration file.
//!
//! Every section is optional; a missing file means all defaults.
//!
//! ```toml
//! [storage]
//! data_dir = "/var/lib/ementa"
//! blob_dir = "/srv/ementa/images"   # optional
//! visitor_dir = "/run/ementa/visitors"   # optional
//! visitor_cache = 1024           # visitors kept in memory
//!
//! [kv]
//! backend = "upstash"            # redb | memory | upstash
//! url = "https://eu1-kv.upstash.io"
//! token = "..."
//!
//! [menu]
//! write_token = "..."            # unset: catalog writes are open
//! read_only = false              # true: refuse every catalog write and upload
//! public_url = "https://menu.example"
//!
//! [upload]
//! secret = "..."
//!
//! [shop]
//! name = "Pizzeria Fenicia"
//! phone = "281325175"
//! ```

use std::path::Path;

use serde::Deserialize;

use ementa_menu::service::{UploadConfig, DEFAULT_CATALOG_KEY};
use ementa_storefront::ShopInfo;

pub const ENV_KV_URL: &str = "KV_REST_API_URL";
pub const ENV_KV_TOKEN: &str = "KV_REST_API_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub kv: KvConfig,
    pub menu: MenuConfig,
    pub upload: UploadSection,
    pub shop: ShopInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Overrides `{data_dir}/data.redb`.
    pub db_path: Option<String>,
    /// Overrides `{data_dir}/blobs`.
    pub blob_dir: Option<String>,
    /// Overrides `{data_dir}/visitors`.
    pub visitor_dir: Option<String>,
    /// How many visitors' storefront state stays in memory. Older ones are
    /// dropped and rebuilt from their file on the next request.
    pub visitor_cache: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            db_path: None,
            blob_dir: None,
            visitor_dir: None,
            visitor_cache: 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KvBackend {
    #[default]
    Redb,
    Memory,
    Upstash,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KvConfig {
    pub backend: KvBackend,
    pub url: Option<String>,
    pub token: Option<String>,
    /// Key the catalog is stored under.
    pub key: String,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            backend: KvBackend::default(),
            url: None,
            token: None,
            key: DEFAULT_CATALOG_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Bearer token required for catalog writes and upload tokens.
    pub write_token: Option<String>,
    /// Refuse catalog writes and upload tokens outright. Wins over
    /// `write_token`.
    pub read_only: bool,
    /// Address customers reach the menu at; used for the share QR code.
    /// Falls back to the request's Host header.
    pub public_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSection {
    pub secret: String,
    pub token_ttl: i64,
    pub public_base_url: String,
    pub max_bytes: usize,
}

impl Default for UploadSection {
    fn default() -> Self {
        let d = UploadConfig::default();
        Self {
            secret: d.secret,
            token_ttl: d.token_ttl,
            public_base_url: d.public_base_url,
            max_bytes: d.max_bytes,
        }
    }
}

impl From<&UploadSection> for UploadConfig {
    fn from(s: &UploadSection) -> Self {
        UploadConfig {
            secret: s.secret.clone(),
            token_ttl: s.token_ttl,
            public_base_url: s.public_base_url.trim_end_matches('/').to_string(),
            max_bytes: s.max_bytes,
        }
    }
}

impl ServerConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `KV_REST_API_URL` / `KV_REST_API_TOKEN`. Non-empty values win
    /// over the file.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(ENV_KV_URL).filter(|v| !v.is_empty()) {
            self.kv.url = Some(url);
        }
        if let Some(token) = var(ENV_KV_TOKEN).filter(|v| !v.is_empty()) {
            self.kv.token = Some(token);
        }
    }
}
