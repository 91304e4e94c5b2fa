//! Route registration: server-rendered pages, their form actions, system
//! endpoints and the module routers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use ementa_core::{Authenticator, ServiceError};
use ementa_menu::print::{compose, PrintConfig};
use ementa_menu::service::{CatalogService, UploadBroker};
use ementa_menu::Language;
use ementa_storefront::view::{document, print_controls, print_preview, share_panel};
use ementa_storefront::{CatalogRemote, MenuStore, ShopInfo};

use crate::actions;
use crate::local::{catalog_source, StoredCatalog};
use crate::visitors::{SharedApp, Visitor, Visitors};

/// Application shared state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub uploads: Arc<UploadBroker>,
    pub auth: Arc<dyn Authenticator>,
    pub visitors: Arc<Visitors>,
    pub shop: Arc<ShopInfo>,
    pub public_url: Option<String>,
}

impl AppState {
    /// The requesting visitor's app and whether it was just loaded.
    pub async fn visitor_app(&self, visitor: &Visitor) -> Result<(SharedApp, bool), ServiceError> {
        self.visitors.app(&visitor.id, &self.catalog, &self.shop).await
    }
}

/// Build the complete router: pages and their actions, system endpoints,
/// then each module.
pub fn build_router(state: AppState, module_routes: Vec<(&str, Router)>) -> Router {
    let max_upload = state.uploads.config().max_bytes;
    let mut app: Router = Router::new()
        .route("/", get(index_page))
        .route("/print", get(print_page))
        .route("/share", get(share_page))
        .merge(actions::routes(max_upload))
        .with_state(state)
        .route("/health", get(health))
        .route("/version", get(version));

    // Module routes carry their own absolute paths (/api/..., /blob/...).
    for (name, router) in module_routes {
        tracing::debug!(module = name, "mounting module routes");
        app = app.merge(router);
    }

    app.layer(TraceLayer::new_for_http())
}

fn parse_lang(code: Option<&str>) -> Language {
    code.and_then(Language::from_code).unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageQuery {
    lang: Option<String>,
    q: Option<String>,
    category: Option<String>,
}

/// GET /: the menu as this visitor sees it, cart and admin mode included.
///
/// The language sticks until another one is picked. Visitors already in
/// memory refetch the catalog so a save by someone else shows up.
async fn index_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Response, ServiceError> {
    let visitor = Visitor::from_headers(&headers);
    let (app, created) = state.visitor_app(&visitor).await?;
    let mut app = app.lock().await;

    if !created {
        let source = catalog_source(&state.catalog, app.session().api_url());
        app.refresh_menu(source.as_ref()).await;
    }
    if let Some(lang) = query.lang.as_deref().and_then(Language::from_code) {
        app.set_lang(lang);
    }
    app.set_query(query.q.as_deref().unwrap_or(""));
    if let Some(category) = &query.category {
        app.select_category(category);
    }

    let html = app.render();
    app.acknowledge_save();
    Ok(visitor.respond(Html(html)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PrintQuery {
    lang: Option<String>,
    paper: Option<String>,
    orientation: Option<String>,
    columns: Option<String>,
    font: Option<String>,
    images: Option<String>,
    grayscale: Option<String>,
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ServiceError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(ServiceError::Validation(format!("{} must be true or false: {}", name, value))),
    }
}

/// Query parameters to print options. Absent parameters keep the defaults,
/// except the two checkboxes: once the panel form has been submitted
/// (signalled by `paper`), an absent checkbox means unchecked.
fn print_config(query: &PrintQuery) -> Result<PrintConfig, ServiceError> {
    let mut config = PrintConfig::default();
    let invalid = ServiceError::Validation;

    if let Some(v) = &query.paper {
        config.paper = v.parse().map_err(invalid)?;
    }
    if let Some(v) = &query.orientation {
        config.orientation = v.parse().map_err(invalid)?;
    }
    if let Some(v) = &query.columns {
        config.columns = v.parse().map_err(invalid)?;
    }
    if let Some(v) = &query.font {
        config.font = v.parse().map_err(invalid)?;
    }

    let submitted = query.paper.is_some();
    config.show_images = match &query.images {
        Some(v) => parse_flag("images", v)?,
        None => !submitted && config.show_images,
    };
    config.grayscale = match &query.grayscale {
        Some(v) => parse_flag("grayscale", v)?,
        None => config.grayscale,
    };
    Ok(config)
}

/// GET /print: adjustments panel and page preview.
async fn print_page(
    State(state): State<AppState>,
    Query(query): Query<PrintQuery>,
) -> Result<Html<String>, ServiceError> {
    let lang = parse_lang(query.lang.as_deref());
    let config = print_config(&query)?;

    let source = StoredCatalog::new(state.catalog.clone());
    let mut menu = MenuStore::new();
    menu.load(Some(&source as &dyn CatalogRemote)).await;

    let layout = compose(menu.catalog(), lang, &config);
    let body = format!("{}{}", print_controls(&config, lang), print_preview(&layout, lang));
    Ok(Html(document(&state.shop.name, lang, &body)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ShareQuery {
    lang: Option<String>,
}

/// GET /share: QR code pointing at the menu.
async fn share_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ShareQuery>,
) -> Html<String> {
    let lang = parse_lang(query.lang.as_deref());
    let base = match &state.public_url {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("localhost");
            format!("http://{}", host)
        }
    };
    let url = format!("{}/?lang={}", base, lang.code());
    Html(document(&state.shop.name, lang, &share_panel(&url, lang)))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "ementad",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
