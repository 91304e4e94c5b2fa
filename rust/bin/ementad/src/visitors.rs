//! Per-visitor storefront state.
//!
//! Each browser carries a session cookie naming a JSON file under the
//! visitor directory. That file is the visitor's local storage (cart, admin
//! flag, settings). The [`App`] built over it stays in memory between
//! requests so an admin's edits survive until saved. When more than
//! `capacity` visitors are held, the oldest is dropped; its next request
//! rebuilds the app from the file.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

use ementa_core::{new_id, ServiceError};
use ementa_menu::service::CatalogService;
use ementa_storefront::storage::API_URL_KEY;
use ementa_storefront::{App, FileStorage, LocalStorage, ShopInfo};

use crate::local::catalog_source;

pub const SESSION_COOKIE: &str = "ementa_session";

/// A visitor's app, shared by their concurrent requests.
pub type SharedApp = Arc<AsyncMutex<App>>;

/// Who sent a request, and whether the id was just minted.
#[derive(Debug, Clone)]
pub struct Visitor {
    pub id: String,
    pub is_new: bool,
}

impl Visitor {
    /// The id from the session cookie, or a fresh one when the cookie is
    /// missing or malformed.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match session_id(headers) {
            Some(id) => Self { id, is_new: false },
            None => Self { id: new_id(), is_new: true },
        }
    }

    /// Attach the session cookie when the id is new.
    pub fn respond(&self, resp: impl IntoResponse) -> Response {
        let mut resp = resp.into_response();
        if self.is_new {
            if let Ok(value) = HeaderValue::from_str(&session_cookie(&self.id)) {
                resp.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        resp
    }
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|id| is_valid_id(id))
}

/// Ids name files on disk: exactly what `new_id` produces, nothing else.
fn is_valid_id(id: &str) -> bool {
    id.len() == 32 && id.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

fn session_cookie(id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=31536000", SESSION_COOKIE, id)
}

#[derive(Default)]
struct Table {
    apps: HashMap<String, SharedApp>,
    order: VecDeque<String>,
}

pub struct Visitors {
    dir: PathBuf,
    capacity: usize,
    table: Mutex<Table>,
}

fn poisoned() -> ServiceError {
    ServiceError::Internal("visitor table lock poisoned".into())
}

impl Visitors {
    pub fn new(dir: PathBuf, capacity: usize) -> Self {
        Self {
            dir,
            capacity: capacity.max(1),
            table: Mutex::new(Table::default()),
        }
    }

    /// The in-memory app for `id`, if one is held.
    pub fn get(&self, id: &str) -> Result<Option<SharedApp>, ServiceError> {
        let table = self.table.lock().map_err(|_| poisoned())?;
        Ok(table.apps.get(id).cloned())
    }

    /// The visitor's app, built from their storage file on first use.
    /// The flag is true when the app was just built, and so just loaded.
    pub async fn app(
        &self,
        id: &str,
        catalog: &Arc<CatalogService>,
        shop: &ShopInfo,
    ) -> Result<(SharedApp, bool), ServiceError> {
        if let Some(app) = self.get(id)? {
            return Ok((app, false));
        }

        let path = self.dir.join(format!("{}.json", id));
        let storage = tokio::task::spawn_blocking(move || FileStorage::open(&path))
            .await
            .map_err(|e| ServiceError::Internal(format!("worker failed: {}", e)))?
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let storage: Arc<dyn LocalStorage> = Arc::new(storage);

        let api_url = storage.get_item(API_URL_KEY).filter(|u| !u.trim().is_empty());
        let source = catalog_source(catalog, api_url);
        let app = App::start(storage, Some(source.as_ref()))
            .await
            .with_shop(shop.clone());
        debug!(visitor = id, "visitor state loaded");

        self.insert(id, app).map(|app| (app, true))
    }

    fn insert(&self, id: &str, app: App) -> Result<SharedApp, ServiceError> {
        let mut table = self.table.lock().map_err(|_| poisoned())?;
        // A concurrent first request may have won the race.
        if let Some(existing) = table.apps.get(id) {
            return Ok(existing.clone());
        }

        let app = Arc::new(AsyncMutex::new(app));
        table.apps.insert(id.to_string(), app.clone());
        table.order.push_back(id.to_string());
        while table.order.len() > self.capacity {
            if let Some(oldest) = table.order.pop_front() {
                table.apps.remove(&oldest);
                info!(visitor = %oldest, "visitor state evicted from memory");
            }
        }
        Ok(app)
    }
}
