//! `ementad`: the menu server.
//!
//! Usage:
//!   ementad [-c <config.toml>] [--listen <addr>]
//!
//! Without a config file every setting takes its default. `KV_REST_API_URL`
//! and `KV_REST_API_TOKEN` override the KV credentials from the file.

mod actions;
mod bootstrap;
mod config;
mod local;
mod routes;
mod visitors;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use ementa_core::Module;
use ementa_menu::service::{CatalogService, UploadBroker, UploadConfig};
use ementa_menu::MenuModule;

use config::ServerConfig;
use routes::AppState;
use visitors::Visitors;

/// Ementa menu server.
#[derive(Parser, Debug)]
#[command(name = "ementad", about = "Ementa menu server")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        info!("Loading configuration from {}", path.display());
    }
    let mut server_config = ServerConfig::load(cli.config.as_deref())?;
    server_config.apply_env(|name| std::env::var(name).ok());
    bootstrap::verify_config(&server_config)?;

    let paths = bootstrap::service_config(&server_config, &cli.listen);
    let kv = bootstrap::open_kv(&server_config, &paths)?;
    let blobs = bootstrap::open_blobs(&paths)?;

    let catalog = Arc::new(CatalogService::new(kv, server_config.kv.key.clone()));
    let uploads = Arc::new(UploadBroker::new(blobs, UploadConfig::from(&server_config.upload)));
    let auth = bootstrap::authenticator(&server_config);
    let menu_module = MenuModule::new(catalog, uploads.clone(), auth.clone());
    info!("Menu module initialized");

    let module_routes = vec![(menu_module.name(), menu_module.routes())];

    let visitor_dir = paths.resolve_visitor_dir();
    info!("Visitor state under {}", visitor_dir.display());
    let app_state = AppState {
        catalog: Arc::clone(menu_module.catalog()),
        uploads,
        auth,
        visitors: Arc::new(Visitors::new(visitor_dir, server_config.storage.visitor_cache)),
        shop: Arc::new(server_config.shop.clone()),
        public_url: server_config.menu.public_url.clone(),
    };
    let app = routes::build_router(app_state, module_routes);

    let listener = tokio::net::TcpListener::bind(&paths.listen).await?;
    info!("Ementa server listening on {}", paths.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
