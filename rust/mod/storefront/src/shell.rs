//! The application shell: all client state in one place, driven by
//! explicit operations.
//!
//! Each operation mutates the stores it touches and persists right there;
//! nothing is written behind the caller's back. [`App::render`] turns the
//! current state into the menu page.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::{info, warn};

use ementa_menu::search::filter_catalog;
use ementa_menu::{Catalog, ItemPatch, Language};

use crate::cart::CartStore;
use crate::menu_store::{MenuStore, SaveOutcome, SaveStatus};
use crate::remote::{ApiError, CatalogRemote, ImageUploader};
use crate::session::{AdminSession, SettingsError};
use crate::storage::LocalStorage;
use crate::view::{menu_page, MenuPage, ShopInfo};

pub struct App {
    lang: Language,
    query: String,
    active_category: Option<String>,
    menu: MenuStore,
    cart: CartStore,
    session: AdminSession,
    settings_error: Option<String>,
    shop: ShopInfo,
    storage: Arc<dyn LocalStorage>,
}

impl App {
    /// Restore the cart and admin flag, then load the menu.
    pub async fn start(storage: Arc<dyn LocalStorage>, remote: Option<&dyn CatalogRemote>) -> Self {
        let mut menu = MenuStore::new();
        menu.load(remote).await;
        let app = Self {
            lang: Language::default(),
            query: String::new(),
            active_category: None,
            menu,
            cart: CartStore::restore(storage.clone()),
            session: AdminSession::restore(storage.clone()),
            settings_error: None,
            shop: ShopInfo::default(),
            storage,
        };
        info!(
            items = app.menu.catalog().item_count(),
            cart = app.cart.item_count(),
            admin = app.session.is_admin(),
            "storefront started"
        );
        app
    }

    pub fn with_shop(mut self, shop: ShopInfo) -> Self {
        self.shop = shop;
        self
    }

    pub fn storage(&self) -> &Arc<dyn LocalStorage> {
        &self.storage
    }

    pub fn lang(&self) -> Language {
        self.lang
    }

    pub fn set_lang(&mut self, lang: Language) {
        self.lang = lang;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn select_category(&mut self, category_id: &str) {
        self.active_category = Some(category_id.to_string());
    }

    pub fn active_category(&self) -> Option<&str> {
        self.active_category.as_deref()
    }

    pub fn menu(&self) -> &MenuStore {
        &self.menu
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn session(&self) -> &AdminSession {
        &self.session
    }

    /// Fetch the catalog again so visitors see the latest saved menu.
    ///
    /// Skipped for admins, whose in-memory copy may hold unsaved edits, and
    /// while a save is in flight. Returns whether a fetch happened.
    pub async fn refresh_menu(&mut self, remote: &dyn CatalogRemote) -> bool {
        if self.session.is_admin() || !self.menu.can_save() {
            return false;
        }
        self.menu.load(Some(remote)).await;
        true
    }

    /// The catalog as currently filtered by the search box.
    pub fn visible_catalog(&self) -> Cow<'_, Catalog> {
        filter_catalog(self.menu.catalog(), &self.query)
    }

    // ── Cart ──

    /// Add one of the item to the cart. False when the id is unknown.
    pub fn add_to_cart(&mut self, item_id: &str) -> bool {
        match self.menu.catalog().find_item(item_id) {
            Some(item) => {
                self.cart.add(item);
                true
            }
            None => false,
        }
    }

    pub fn update_cart_quantity(&mut self, item_id: &str, delta: i64) {
        self.cart.update_quantity(item_id, delta);
    }

    pub fn remove_from_cart(&mut self, item_id: &str) {
        self.cart.remove(item_id);
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    // ── Admin ──

    pub fn set_password_input(&mut self, password: &str) {
        self.session.password_input = password.to_string();
    }

    pub fn login(&mut self) -> bool {
        self.session.login()
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.settings_error = None;
    }

    pub fn update_settings(
        &mut self,
        new_password: &str,
        confirm_password: &str,
        api_url: &str,
    ) -> Result<(), SettingsError> {
        let result = self.session.update_settings(new_password, confirm_password, api_url);
        self.settings_error = result.as_ref().err().map(ToString::to_string);
        result
    }

    pub fn edit_item(&mut self, item_id: &str, patch: &ItemPatch) -> bool {
        self.menu.update_item_field(item_id, patch)
    }

    /// Replace the item's ingredient text in the current language.
    pub fn edit_ingredients(&mut self, item_id: &str, text: &str) -> bool {
        self.menu.update_ingredient_text(item_id, self.lang, text)
    }

    /// Send the catalog. Skipped while another save is in flight.
    pub async fn save(&mut self, remote: &dyn CatalogRemote) -> SaveOutcome {
        self.menu.persist(remote).await
    }

    /// First half of a save driven by the caller: the snapshot to send, or
    /// None while one is already in flight.
    pub fn begin_save(&mut self) -> Option<Catalog> {
        self.menu.begin_save()
    }

    pub fn finish_save(&mut self, result: Result<(), ApiError>) -> SaveOutcome {
        self.menu.finish_save(result)
    }

    /// Drop a "saved" confirmation once it has been shown.
    pub fn acknowledge_save(&mut self) {
        if *self.menu.save_status() == SaveStatus::Saved {
            self.menu.reset_save_status();
        }
    }

    /// Upload an image and point the item at it. On failure the item keeps
    /// its current image.
    pub async fn upload_image(
        &mut self,
        item_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
        uploader: &dyn ImageUploader,
    ) -> Result<String, ApiError> {
        let url = uploader.upload(file_name, bytes, content_type).await.map_err(|e| {
            warn!(item = item_id, error = %e, "image upload failed");
            e
        })?;
        if !self.menu.update_item_field(item_id, &ItemPatch::image(&url)) {
            warn!(item = item_id, "uploaded image for unknown item");
        }
        Ok(url)
    }

    // ── Rendering ──

    pub fn render(&self) -> String {
        let visible = self.visible_catalog();
        let api_url = self.session.api_url();
        menu_page(&MenuPage {
            shop: &self.shop,
            lang: self.lang,
            query: &self.query,
            catalog: self.menu.catalog(),
            visible: &visible,
            active_category: self.active_category.as_deref(),
            is_admin: self.session.is_admin(),
            load_error: self.menu.load_error(),
            save_status: self.menu.save_status(),
            can_save: self.menu.can_save(),
            cart: &self.cart,
            login_error: self.session.error.as_deref(),
            api_url: api_url.as_deref(),
            settings_error: self.settings_error.as_deref(),
        })
    }
}
