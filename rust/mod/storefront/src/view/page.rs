use std::fmt::Write;

use serde::Deserialize;

use ementa_menu::{Catalog, Language};

use super::{
    admin_bar, category_nav, category_section, escape, language_selector, login_form, offline_banner,
    order_notepad, search_box, settings_form, tel_link, CardMode,
};
use crate::cart::CartStore;
use crate::i18n::t;
use crate::menu_store::SaveStatus;

/// Restaurant details shown in the header and footer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShopInfo {
    pub name: String,
    pub phone: String,
    pub hours: String,
    pub address: String,
}

impl Default for ShopInfo {
    fn default() -> Self {
        Self {
            name: "Pizzeria Fenicia".into(),
            phone: "281325175".into(),
            hours: String::new(),
            address: String::new(),
        }
    }
}

/// Everything the menu page reads.
pub struct MenuPage<'a> {
    pub shop: &'a ShopInfo,
    pub lang: Language,
    pub query: &'a str,
    /// The full catalog; drives the category navigation.
    pub catalog: &'a Catalog,
    /// The catalog after search filtering; drives the sections.
    pub visible: &'a Catalog,
    pub active_category: Option<&'a str>,
    pub is_admin: bool,
    pub load_error: Option<&'a str>,
    pub save_status: &'a SaveStatus,
    pub can_save: bool,
    pub cart: &'a CartStore,
    pub login_error: Option<&'a str>,
    pub api_url: Option<&'a str>,
    pub settings_error: Option<&'a str>,
}

/// Wrap `body` in a complete HTML document.
pub fn document(title: &str, lang: Language, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html lang="{code}"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{title}</title></head><body>{body}</body></html>"#,
        code = lang.code(),
        title = escape(title),
        body = body,
    )
}

pub fn menu_page(page: &MenuPage<'_>) -> String {
    let lang = page.lang;
    let mode = if page.is_admin { CardMode::Edit } else { CardMode::View };
    let mut body = String::new();

    if page.is_admin {
        body.push_str(&admin_bar(lang, page.save_status, page.can_save));
    } else if page.load_error.is_some() {
        body.push_str(&offline_banner(lang));
    }

    body.push_str(&language_selector(lang));
    let _ = write!(
        body,
        r#"<header class="hero"><h1>{name}</h1><p class="slogan">{slogan}</p><a class="call-button" href="{tel}">{call} - {phone}</a></header>"#,
        name = escape(&page.shop.name),
        slogan = escape(t(lang, "slogan")),
        tel = escape(&tel_link(&page.shop.phone)),
        call = escape(t(lang, "call_to_order")),
        phone = escape(&page.shop.phone),
    );
    body.push_str(&search_box(page.query, lang));
    body.push_str(&category_nav(page.catalog, lang, page.active_category));

    body.push_str(r#"<main class="menu">"#);
    if page.visible.is_empty() {
        let _ = write!(body, r#"<p class="no-items">{}</p>"#, escape(t(lang, "no_items_found")));
    } else {
        for category in page.visible {
            body.push_str(&category_section(category, lang, mode));
        }
    }
    body.push_str("</main>");

    if page.is_admin {
        body.push_str(&settings_form(lang, page.api_url, page.settings_error));
    } else {
        body.push_str(&order_notepad(page.cart, lang, &page.shop.phone));
    }

    let _ = write!(
        body,
        r#"<nav class="floating-actions"><a href="/share?lang={code}">{share}</a>"#,
        code = lang.code(),
        share = escape(t(lang, "share_menu")),
    );
    if page.is_admin {
        let _ = write!(body, r#"<a href="/print?lang={}">{}</a>"#, lang.code(), escape(t(lang, "print")));
    }
    body.push_str("</nav>");

    body.push_str(r#"<footer class="site-footer">"#);
    if !page.shop.address.is_empty() {
        let _ = write!(
            body,
            r#"<p class="location"><strong>{}</strong> {}</p>"#,
            escape(t(lang, "location")),
            escape(&page.shop.address),
        );
    }
    if !page.shop.hours.is_empty() {
        let _ = write!(
            body,
            r#"<p class="hours"><strong>{}</strong> {}</p>"#,
            escape(t(lang, "hours")),
            escape(&page.shop.hours),
        );
    }
    if !page.is_admin {
        body.push_str(&login_form(lang, page.login_error));
    }
    body.push_str("</footer>");

    document(&page.shop.name, lang, &body)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStorage;
    use ementa_menu::data::default_catalog;
    use ementa_menu::search::filter_catalog;

    fn render(catalog: &Catalog, query: &str, is_admin: bool, load_error: Option<&str>) -> String {
        let shop = ShopInfo::default();
        let cart = CartStore::new(Arc::new(MemoryStorage::new()));
        let visible = filter_catalog(catalog, query);
        menu_page(&MenuPage {
            shop: &shop,
            lang: Language::En,
            query,
            catalog,
            visible: &visible,
            active_category: None,
            is_admin,
            load_error,
            save_status: &SaveStatus::Idle,
            can_save: true,
            cart: &cart,
            login_error: None,
            api_url: None,
            settings_error: None,
        })
    }

    #[test]
    fn visitor_page() {
        let catalog = default_catalog().unwrap();
        let html = render(&catalog, "", false, None);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Pizzeria Fenicia"));
        assert!(html.contains("order-notepad"));
        assert!(html.contains("login-form"));
        assert!(!html.contains("admin-bar"));
        assert!(!html.contains("offline-banner"));
        assert!(!html.contains("/print?"));
        assert_eq!(html.matches(r#"class="item-card""#).count(), catalog.item_count());
    }

    #[test]
    fn admin_page_uses_edit_cards() {
        let catalog = default_catalog().unwrap();
        let html = render(&catalog, "", true, Some("network down"));
        assert!(html.contains("admin-bar"));
        assert!(html.contains("settings-form"));
        assert!(html.contains("/print?lang=en"));
        assert!(!html.contains("offline-banner"));
        assert!(!html.contains("order-notepad"));
        assert!(!html.contains("/cart/"));
    }

    #[test]
    fn offline_banner_for_visitors() {
        let catalog = default_catalog().unwrap();
        let html = render(&catalog, "", false, Some("network down"));
        assert!(html.contains("offline-banner"));
    }

    #[test]
    fn search_without_hits() {
        let catalog = default_catalog().unwrap();
        let html = render(&catalog, "zzzz-nothing", false, None);
        assert!(html.contains("no-items"));
        assert!(!html.contains(r#"class="item-card""#));
        // Navigation still lists every category.
        assert_eq!(html.matches("category-link").count(), catalog.categories.len());
    }
}
