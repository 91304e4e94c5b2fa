use tracing::{info, warn};

use ementa_menu::data::default_catalog;
use ementa_menu::{Catalog, ItemPatch, Language};

use crate::remote::{ApiError, CatalogRemote};

/// Progress of the last explicit save.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Failed(String),
}

/// What a save request ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed(String),
    /// Another save was still in flight; nothing was sent.
    Skipped,
}

/// The editable in-memory copy of the catalog.
#[derive(Debug, Default)]
pub struct MenuStore {
    catalog: Catalog,
    load_error: Option<String>,
    save_status: SaveStatus,
}

impl MenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the bundled catalog, then apply the remote override if one
    /// exists. Failures are recorded in `load_error`, never returned.
    pub async fn load(&mut self, remote: Option<&dyn CatalogRemote>) {
        self.load_error = None;
        self.catalog = match default_catalog() {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "bundled catalog unreadable");
                self.load_error = Some(format!("bundled catalog: {}", e));
                Catalog::default()
            }
        };

        let Some(remote) = remote else { return };
        match remote.fetch().await {
            Ok(Some(catalog)) => {
                info!(categories = catalog.categories.len(), "using stored catalog");
                self.catalog = catalog;
            }
            Ok(None) => info!("no stored catalog, using bundled one"),
            Err(e) => {
                warn!(error = %e, "catalog fetch failed, using bundled one");
                self.load_error = Some(e.to_string());
            }
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save_status
    }

    /// False while a save is in flight; the admin bar disables its button.
    pub fn can_save(&self) -> bool {
        self.save_status != SaveStatus::Saving
    }

    /// Apply `patch` to the item with this id. Returns whether one matched.
    pub fn update_item_field(&mut self, item_id: &str, patch: &ItemPatch) -> bool {
        match self.catalog.find_item_mut(item_id) {
            Some(item) => {
                item.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Replace one language's ingredient text of an item.
    pub fn update_ingredient_text(&mut self, item_id: &str, lang: Language, text: &str) -> bool {
        match self.catalog.find_item_mut(item_id) {
            Some(item) => {
                item.ingredients.set(lang, text);
                true
            }
            None => false,
        }
    }

    /// Mark a save as started and return the catalog to send, or None when
    /// one is already in flight.
    ///
    /// This is the only guard against overlapping saves; it is advisory and
    /// the store itself still accepts whichever write arrives last.
    pub fn begin_save(&mut self) -> Option<Catalog> {
        if !self.can_save() {
            return None;
        }
        self.save_status = SaveStatus::Saving;
        Some(self.catalog.clone())
    }

    pub fn finish_save(&mut self, result: Result<(), ApiError>) -> SaveOutcome {
        match result {
            Ok(()) => {
                self.save_status = SaveStatus::Saved;
                SaveOutcome::Saved
            }
            Err(e) => {
                warn!(error = %e, "catalog save failed");
                let message = e.to_string();
                self.save_status = SaveStatus::Failed(message.clone());
                SaveOutcome::Failed(message)
            }
        }
    }

    /// Back to idle after the "saved" confirmation has been shown.
    pub fn reset_save_status(&mut self) {
        if self.save_status != SaveStatus::Saving {
            self.save_status = SaveStatus::Idle;
        }
    }

    /// Send the whole catalog in one write. No retry.
    pub async fn persist(&mut self, remote: &dyn CatalogRemote) -> SaveOutcome {
        let Some(snapshot) = self.begin_save() else {
            return SaveOutcome::Skipped;
        };
        let result = remote.store(&snapshot).await;
        self.finish_save(result)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory remote with switchable failure.
    #[derive(Default)]
    pub(crate) struct FakeRemote {
        pub stored: Mutex<Option<Catalog>>,
        pub fail: bool,
        pub writes: Mutex<usize>,
    }

    impl FakeRemote {
        pub fn failing() -> Self {
            Self { fail: true, ..Default::default() }
        }

        pub fn with(catalog: Catalog) -> Self {
            Self { stored: Mutex::new(Some(catalog)), ..Default::default() }
        }
    }

    #[async_trait::async_trait]
    impl CatalogRemote for FakeRemote {
        async fn fetch(&self) -> Result<Option<Catalog>, ApiError> {
            if self.fail {
                return Err(ApiError::Server { status: 500, message: "KV down".into() });
            }
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn store(&self, catalog: &Catalog) -> Result<(), ApiError> {
            if self.fail {
                return Err(ApiError::Server { status: 500, message: "KV down".into() });
            }
            *self.writes.lock().unwrap() += 1;
            *self.stored.lock().unwrap() = Some(catalog.clone());
            Ok(())
        }
    }

    async fn loaded() -> MenuStore {
        let mut store = MenuStore::new();
        store.load(None).await;
        store
    }

    #[tokio::test]
    async fn load_uses_bundled_catalog() {
        let store = loaded().await;
        assert_eq!(store.catalog().item_count(), 48);
        assert!(store.load_error().is_none());
    }

    #[tokio::test]
    async fn remote_override_replaces_default() {
        let mut small = default_catalog().unwrap();
        small.categories.truncate(2);
        let remote = FakeRemote::with(small.clone());

        let mut store = MenuStore::new();
        store.load(Some(&remote as &dyn CatalogRemote)).await;
        assert_eq!(store.catalog(), &small);
    }

    #[tokio::test]
    async fn fetch_failure_is_recorded_and_default_kept() {
        let remote = FakeRemote::failing();
        let mut store = MenuStore::new();
        store.load(Some(&remote as &dyn CatalogRemote)).await;
        assert_eq!(store.catalog().item_count(), 48);
        assert!(store.load_error().unwrap().contains("KV down"));
    }

    #[tokio::test]
    async fn update_item_field_touches_one_item() {
        let mut store = loaded().await;
        let before = store.catalog().clone();

        assert!(store.update_item_field("e01", &ItemPatch::price("4.00€")));
        assert_eq!(store.catalog().find_item("e01").unwrap().price, "4.00€");
        for item in store.catalog().items().filter(|i| i.id != "e01") {
            assert_eq!(Some(item), before.find_item(&item.id));
        }
    }

    #[tokio::test]
    async fn unknown_item_is_noop() {
        let mut store = loaded().await;
        let before = store.catalog().clone();
        assert!(!store.update_item_field("nope", &ItemPatch::name("x")));
        assert!(!store.update_ingredient_text("nope", Language::En, "x"));
        assert_eq!(store.catalog(), &before);
    }

    #[tokio::test]
    async fn ingredient_update_keeps_other_languages() {
        let mut store = loaded().await;
        let before = store.catalog().find_item("e00").unwrap().ingredients.clone();
        store.update_ingredient_text("e00", Language::En, "Fresh bread");
        let after = &store.catalog().find_item("e00").unwrap().ingredients;
        assert_eq!(after.en, "Fresh bread");
        assert_eq!(after.pt, before.pt);
        assert_eq!(after.de, before.de);
    }

    #[tokio::test]
    async fn persist_writes_whole_catalog() {
        let remote = FakeRemote::default();
        let mut store = loaded().await;
        store.update_item_field("e00", &ItemPatch::name("Pão caseiro"));

        assert_eq!(store.persist(&remote).await, SaveOutcome::Saved);
        assert_eq!(store.save_status(), &SaveStatus::Saved);
        assert_eq!(remote.stored.lock().unwrap().as_ref(), Some(store.catalog()));

        store.reset_save_status();
        assert_eq!(store.save_status(), &SaveStatus::Idle);
    }

    #[tokio::test]
    async fn persist_failure_reenables_save() {
        let remote = FakeRemote::failing();
        let mut store = loaded().await;
        let outcome = store.persist(&remote).await;
        assert!(matches!(outcome, SaveOutcome::Failed(ref m) if m.contains("KV down")));
        assert!(store.can_save());
    }

    #[tokio::test]
    async fn second_save_while_in_flight_is_refused() {
        let remote = FakeRemote::default();
        let mut store = loaded().await;

        let snapshot = store.begin_save().unwrap();
        assert!(!store.can_save());
        assert!(store.begin_save().is_none());
        assert_eq!(store.persist(&remote).await, SaveOutcome::Skipped);
        assert_eq!(*remote.writes.lock().unwrap(), 0);

        let result = remote.store(&snapshot).await;
        assert_eq!(store.finish_save(result), SaveOutcome::Saved);
        assert!(store.can_save());
    }
}
