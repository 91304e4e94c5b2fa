//! Startup checks and store construction.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use ementa_core::{AllowAll, Authenticator, BearerSecret, DenyAll, ServiceConfig};
use ementa_kv::{KVStore, MemoryStore, RedbStore, UpstashConfig, UpstashStore};
use ementa_menu::service::UploadConfig;

use crate::config::{KvBackend, ServerConfig};

/// Refuse to start on a configuration that cannot work at all.
///
/// Missing KV credentials are not fatal: the catalog endpoint answers with
/// an infrastructure error until they are provided.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.trim().is_empty() {
        anyhow::bail!("storage.data_dir is empty in configuration.");
    }
    if config.upload.secret.is_empty() {
        anyhow::bail!("upload.secret is empty in configuration.");
    }
    if config.upload.secret == UploadConfig::default().secret {
        warn!("upload.secret is the built-in development value");
    }
    if config.storage.visitor_cache == 0 {
        anyhow::bail!("storage.visitor_cache must be at least 1.");
    }
    if config.kv.key.trim().is_empty() {
        anyhow::bail!("kv.key is empty in configuration.");
    }
    if config.kv.backend == KvBackend::Upstash && (config.kv.url.is_none() || config.kv.token.is_none()) {
        warn!("upstash backend selected without URL or token; catalog requests will fail");
    }
    if config.menu.write_token.is_none() && !config.menu.read_only {
        warn!("menu.write_token not set; anyone can overwrite the catalog");
    }
    Ok(())
}

pub fn service_config(config: &ServerConfig, listen: &str) -> ServiceConfig {
    ServiceConfig {
        data_dir: Some(PathBuf::from(&config.storage.data_dir)),
        db_path: config.storage.db_path.as_ref().map(PathBuf::from),
        blob_dir: config.storage.blob_dir.as_ref().map(PathBuf::from),
        visitor_dir: config.storage.visitor_dir.as_ref().map(PathBuf::from),
        listen: listen.to_string(),
    }
}

pub fn open_kv(config: &ServerConfig, paths: &ServiceConfig) -> anyhow::Result<Arc<dyn KVStore>> {
    let kv: Arc<dyn KVStore> = match config.kv.backend {
        KvBackend::Redb => {
            let path = paths.resolve_db_path();
            let store = RedbStore::open(&path)
                .map_err(|e| anyhow::anyhow!("failed to open KV store {}: {}", path.display(), e))?;
            Arc::new(store)
        }
        KvBackend::Memory => Arc::new(MemoryStore::new()),
        KvBackend::Upstash => Arc::new(UpstashStore::new(UpstashConfig {
            url: config.kv.url.clone(),
            token: config.kv.token.clone(),
        })),
    };
    info!(backend = kv.backend(), "KV store ready");
    Ok(kv)
}

pub fn open_blobs(paths: &ServiceConfig) -> anyhow::Result<Arc<dyn ementa_blob::BlobStore>> {
    let dir = paths.resolve_blob_dir();
    let store = ementa_blob::FileStore::open(&dir)
        .map_err(|e| anyhow::anyhow!("failed to open blob store {}: {}", dir.display(), e))?;
    info!(dir = %dir.display(), "blob store ready");
    Ok(Arc::new(store))
}

/// Write protection for the catalog and upload tokens.
pub fn authenticator(config: &ServerConfig) -> Arc<dyn Authenticator> {
    if config.menu.read_only {
        info!("read-only mode: catalog writes are refused");
        return Arc::new(DenyAll);
    }
    match config.menu.write_token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => Arc::new(BearerSecret::new(token)),
        None => Arc::new(AllowAll),
    }
}
