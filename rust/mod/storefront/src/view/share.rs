use qrcode::render::svg;
use qrcode::QrCode;
use tracing::warn;

use ementa_menu::Language;

use super::escape;
use crate::i18n::t;

/// QR code for `url` plus the plain link. If the URL cannot be encoded the
/// panel degrades to the link alone.
pub fn share_panel(url: &str, lang: Language) -> String {
    let qr = match QrCode::new(url.as_bytes()) {
        Ok(code) => code
            .render::<svg::Color>()
            .min_dimensions(200, 200)
            .dark_color(svg::Color("#1d3c18"))
            .light_color(svg::Color("#ffffff"))
            .build(),
        Err(e) => {
            warn!(error = %e, url, "QR code not generated");
            String::new()
        }
    };

    format!(
        r#"<div class="share-panel"><h2>{title}</h2><p>{hint}</p><div class="qr-code">{qr}</div><a class="share-link" href="{url}">{url}</a><label class="copy-link">{copy}<input type="text" readonly value="{url}"></label></div>"#,
        title = escape(t(lang, "share_menu")),
        hint = escape(t(lang, "point_camera")),
        qr = qr,
        url = escape(url),
        copy = escape(t(lang, "copy_link")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_svg_and_link() {
        let html = share_panel("https://ementa.example/?lang=en", Language::En);
        assert!(html.contains("<svg"));
        assert!(html.contains(r#"href="https://ementa.example/?lang=en""#));
        assert!(html.contains(t(Language::En, "copy_link")));
    }

    #[test]
    fn oversized_url_falls_back_to_link() {
        let url = format!("https://ementa.example/{}", "x".repeat(8000));
        let html = share_panel(&url, Language::Pt);
        assert!(!html.contains("<svg"));
        assert!(html.contains("share-link"));
    }
}
