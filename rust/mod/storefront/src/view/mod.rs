//! HTML views. Every function here is pure: state in, markup out.
//!
//! Views emit semantic HTML with class hooks. Every control is a plain form
//! posting to the server's action routes (`/cart/...`, `/admin/...`), so the
//! page works without scripts. All text goes through [`escape`].

mod admin;
mod menu;
mod order;
mod page;
mod print;
mod share;

pub use admin::{admin_bar, login_form, offline_banner, settings_form};
pub use menu::{category_nav, category_section, item_card, language_selector, search_box, CardMode};
pub use order::order_notepad;
pub use page::{document, menu_page, MenuPage, ShopInfo};
pub use print::{print_controls, print_preview};
pub use share::share_panel;

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A one-button form posting to `action`.
pub(crate) fn post_button(action: &str, class: &str, label: &str, disabled: bool) -> String {
    format!(
        r#"<form class="inline-action" method="post" action="{action}"><button type="submit" class="{class}"{disabled}>{label}</button></form>"#,
        action = escape(action),
        class = class,
        disabled = if disabled { " disabled" } else { "" },
        label = escape(label),
    )
}

/// `tel:` href for a phone number. Numbers without a leading `+` get the
/// Portuguese country code.
pub fn tel_link(phone: &str) -> String {
    let phone: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    if phone.starts_with('+') {
        format!("tel:{}", phone)
    } else {
        format!("tel:+351{}", phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a href="x">Tom & 'Jerry'</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
    }

    #[test]
    fn post_button_is_a_form() {
        let html = post_button("/cart/p1/add", "add-to-order", "Add & go", false);
        assert_eq!(
            html,
            r#"<form class="inline-action" method="post" action="/cart/p1/add"><button type="submit" class="add-to-order">Add &amp; go</button></form>"#
        );
        assert!(post_button("/admin/save", "save-menu", "Save", true).contains(" disabled>"));
    }

    #[test]
    fn tel_link_adds_country_code() {
        assert_eq!(tel_link("281325175"), "tel:+351281325175");
        assert_eq!(tel_link("281 325 175"), "tel:+351281325175");
        assert_eq!(tel_link("+44 20 7946 0000"), "tel:+442079460000");
    }
}
