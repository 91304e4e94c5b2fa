use std::fmt::Write;

use ementa_menu::print::{Columns, FontSize, Orientation, PaperSize, PrintConfig, PrintLayout};
use ementa_menu::Language;

use super::escape;
use crate::i18n::t;

/// The print adjustments panel. Submits back to the same page as query
/// parameters, so nothing is kept between visits.
pub fn print_controls(config: &PrintConfig, lang: Language) -> String {
    let mut html = format!(
        r#"<form class="print-controls" method="get"><h2>{}</h2><input type="hidden" name="lang" value="{}">"#,
        escape(t(lang, "adjustments")),
        lang.code(),
    );

    let options = |html: &mut String, name: &str, label: &str, values: &[(String, String)], current: &str| {
        let _ = write!(html, r#"<label>{}<select name="{}">"#, escape(label), name);
        for (value, text) in values {
            let selected = if value == current { " selected" } else { "" };
            let _ = write!(html, r#"<option value="{}"{}>{}</option>"#, value, selected, escape(text));
        }
        html.push_str("</select></label>");
    };

    let papers: Vec<_> = PaperSize::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), p.as_str().to_string()))
        .collect();
    options(&mut html, "paper", t(lang, "paper"), &papers, config.paper.as_str());

    let orientations = [Orientation::Portrait, Orientation::Landscape]
        .iter()
        .map(|o| (o.as_str().to_string(), t(lang, o.as_str()).to_string()))
        .collect::<Vec<_>>();
    options(&mut html, "orientation", t(lang, "orientation"), &orientations, config.orientation.as_str());

    let mut columns = vec![("auto".to_string(), "Auto".to_string())];
    columns.extend((1..=Columns::MAX).map(|n| (n.to_string(), n.to_string())));
    let current = match config.columns {
        Columns::Auto => "auto".to_string(),
        Columns::Fixed(n) => n.to_string(),
    };
    options(&mut html, "columns", t(lang, "columns"), &columns, &current);

    let fonts: Vec<_> = FontSize::ALL
        .iter()
        .map(|f| (f.as_str().to_string(), f.as_str().to_string()))
        .collect();
    options(&mut html, "font", t(lang, "font_size"), &fonts, config.font.as_str());

    let checkbox = |name: &str, label: &str, checked: bool| {
        format!(
            r#"<label><input type="checkbox" name="{}" value="true"{}>{}</label>"#,
            name,
            if checked { " checked" } else { "" },
            escape(label),
        )
    };
    html.push_str(&checkbox("images", t(lang, "photos"), config.show_images));
    html.push_str(&checkbox("grayscale", t(lang, "bw"), config.grayscale));

    let _ = write!(
        html,
        r#"<button type="submit">{}</button><button type="button" class="print-page" onclick="window.print()">{}</button></form>"#,
        escape(t(lang, "adjustments")),
        escape(t(lang, "print")),
    );
    html
}

/// The page-shaped preview of a composed layout.
pub fn print_preview(layout: &PrintLayout, lang: Language) -> String {
    let class = if layout.grayscale { "print-preview grayscale" } else { "print-preview" };
    let mut html = format!(
        r#"<div class="{class}" lang="{code}" data-paper="{paper}" data-orientation="{orientation}" style="width:{w}mm;min-height:{h}mm;font-size:{px}px;column-count:{cols}">"#,
        class = class,
        code = lang.code(),
        paper = layout.paper,
        orientation = layout.orientation.as_str(),
        w = layout.width_mm,
        h = layout.height_mm,
        px = layout.font_px,
        cols = layout.columns,
    );

    for section in &layout.sections {
        let _ = write!(
            html,
            r#"<section class="print-section" data-category="{}"><h2>{}</h2><ul>"#,
            escape(&section.category_id),
            escape(&section.title),
        );
        for entry in &section.entries {
            html.push_str(r#"<li class="print-entry">"#);
            if let Some(image) = &entry.image {
                let _ = write!(html, r#"<img src="{}" alt="{}">"#, escape(image), escape(&entry.name));
            }
            if let Some(number) = &entry.number {
                let _ = write!(html, r#"<span class="number">#{}</span> "#, escape(number));
            }
            let _ = write!(
                html,
                r#"<span class="name">{}</span> <span class="price">{}</span><p class="description">{}</p></li>"#,
                escape(&entry.name),
                escape(&entry.price),
                escape(&entry.description),
            );
        }
        html.push_str("</ul></section>");
    }
    html.push_str("</div>");
    html
}
