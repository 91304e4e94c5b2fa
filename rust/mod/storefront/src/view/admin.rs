use std::fmt::Write;

use ementa_menu::Language;

use super::{escape, post_button};
use crate::i18n::t;
use crate::menu_store::SaveStatus;

/// Toolbar shown while in admin mode.
pub fn admin_bar(lang: Language, save_status: &SaveStatus, can_save: bool) -> String {
    let label = match save_status {
        SaveStatus::Saving => t(lang, "saving"),
        SaveStatus::Saved => t(lang, "saved"),
        SaveStatus::Idle | SaveStatus::Failed(_) => t(lang, "update_menu"),
    };
    let mut html = format!(
        r#"<div class="admin-bar"><span class="admin-title">{}</span>"#,
        escape(t(lang, "admin_panel")),
    );
    html.push_str(&post_button("/admin/save", "save-menu", label, !can_save));
    let _ = write!(html, r##"<a class="open-settings" href="#settings">{}</a>"##, escape(t(lang, "settings")));
    html.push_str(&post_button("/admin/logout", "logout", t(lang, "logout"), false));
    if let SaveStatus::Failed(reason) = save_status {
        let _ = write!(
            html,
            r#"<p class="save-error" role="alert">{}: {}</p>"#,
            escape(t(lang, "save_failed")),
            escape(reason),
        );
    }
    html.push_str("</div>");
    html
}

/// Shown to visitors while the menu came from the bundled copy after a
/// failed fetch.
pub fn offline_banner(lang: Language) -> String {
    format!(r#"<div class="offline-banner" role="status">{}</div>"#, escape(t(lang, "offline_mode")))
}

/// Password prompt. The field is always rendered empty.
pub fn login_form(lang: Language, error: Option<&str>) -> String {
    let mut html = format!(
        r#"<form class="login-form" method="post" action="/admin/login"><h2>{title}</h2><label>{password}<input type="password" name="password" value="" autocomplete="current-password"></label>"#,
        title = escape(t(lang, "restricted_access")),
        password = escape(t(lang, "password")),
    );
    if error.is_some() {
        let _ = write!(html, r#"<p class="login-error" role="alert">{}</p>"#, escape(t(lang, "wrong_password")));
    }
    let _ = write!(html, r#"<button type="submit">{}</button></form>"#, escape(t(lang, "access_panel")));
    html
}

/// Password change and API URL override.
pub fn settings_form(lang: Language, api_url: Option<&str>, error: Option<&str>) -> String {
    let mut html = format!(
        r#"<form class="settings-form" id="settings" method="post" action="/admin/settings"><h2>{title}</h2><label>{new}<input type="password" name="new_password" value=""></label><label>{confirm}<input type="password" name="confirm_password" value=""></label><label>{api}<input type="url" name="api_url" value="{url}"></label>"#,
        title = escape(t(lang, "settings")),
        new = escape(t(lang, "new_password")),
        confirm = escape(t(lang, "confirm_password")),
        api = escape(t(lang, "api_url")),
        url = escape(api_url.unwrap_or("")),
    );
    if let Some(error) = error {
        let _ = write!(html, r#"<p class="settings-error" role="alert">{}</p>"#, escape(error));
    }
    let _ = write!(html, r#"<button type="submit">{}</button></form>"#, escape(t(lang, "save_settings")));
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_button_follows_status() {
        let html = admin_bar(Language::En, &SaveStatus::Saving, false);
        assert!(html.contains(r#"action="/admin/save"><button type="submit" class="save-menu" disabled>"#));
        assert!(html.contains(r#"action="/admin/logout""#));
        assert!(html.contains(t(Language::En, "saving")));

        let html = admin_bar(Language::En, &SaveStatus::Idle, true);
        assert!(!html.contains("disabled"));
        assert!(html.contains(t(Language::En, "update_menu")));
    }

    #[test]
    fn failed_save_shows_reason() {
        let html = admin_bar(Language::Pt, &SaveStatus::Failed("KV <down>".into()), true);
        assert!(html.contains("save-error"));
        assert!(html.contains("KV &lt;down&gt;"));
    }

    #[test]
    fn login_error_is_localized() {
        let html = login_form(Language::De, Some("wrong password"));
        assert!(html.contains(t(Language::De, "wrong_password")));
        assert!(!login_form(Language::De, None).contains("login-error"));
        assert!(html.contains(r#"method="post" action="/admin/login""#));
    }

    #[test]
    fn settings_prefills_api_url() {
        let html = settings_form(Language::En, Some("https://menu.example/api/menu"), None);
        assert!(html.contains(r#"value="https://menu.example/api/menu""#));
        assert!(!html.contains("settings-error"));
        assert!(html.contains(r#"method="post" action="/admin/settings""#));
    }
}
