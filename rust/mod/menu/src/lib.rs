//! Menu module: the catalog model and everything the server does with it.
//!
//! # Parts
//!
//! - **model**: languages, localized text, items, categories, catalog
//! - **data**: the bundled default catalog
//! - **search**: free-text filtering
//! - **print**: print layout composition
//! - **service**: catalog persistence and the image upload broker
//! - **api**: `/api/menu`, `/api/upload` and `/blob/*` routes
//!
//! # Usage
//!
//! ```ignore
//! let module = MenuModule::new(catalog_service, upload_broker, auth);
//! let router = module.routes();
//! ```

pub mod api;
pub mod data;
pub mod model;
pub mod print;
pub mod search;
pub mod service;

use std::sync::Arc;

use axum::Router;

use ementa_core::{Authenticator, Module};

use crate::api::MenuState;
use crate::service::{CatalogService, UploadBroker};

pub use model::{Catalog, Category, ItemPatch, Language, LocalizedText, MenuItem};

/// Menu module implementing the Module trait.
pub struct MenuModule {
    state: Arc<MenuState>,
}

impl MenuModule {
    pub fn new(
        catalog: Arc<CatalogService>,
        uploads: Arc<UploadBroker>,
        auth: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            state: Arc::new(MenuState { catalog, uploads, auth }),
        }
    }

    /// Catalog service, shared with the server-rendered pages.
    pub fn catalog(&self) -> &Arc<CatalogService> {
        &self.state.catalog
    }
}

impl Module for MenuModule {
    fn name(&self) -> &str {
        "menu"
    }

    fn routes(&self) -> Router {
        api::build_router(self.state.clone())
    }
}
