use std::fmt::Write;

use ementa_menu::service::ALLOWED_CONTENT_TYPES;
use ementa_menu::{Catalog, Category, Language, MenuItem};

use super::{escape, post_button};
use crate::i18n::t;

/// Whether an item card shows text or inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardMode {
    #[default]
    View,
    Edit,
}

pub fn language_selector(current: Language) -> String {
    let mut html = String::from(r#"<nav class="language-selector">"#);
    for lang in Language::ALL {
        let class = if lang == current { "flag current" } else { "flag" };
        let _ = write!(
            html,
            r#"<a class="{class}" href="?lang={code}" hreflang="{code}" title="{label}"><img src="{flag}" alt="{label}"></a>"#,
            class = class,
            code = lang.code(),
            label = escape(lang.label()),
            flag = lang.flag_url(),
        );
    }
    html.push_str("</nav>");
    html
}

pub fn search_box(query: &str, lang: Language) -> String {
    format!(
        r#"<form class="search-box" method="get" role="search"><input type="hidden" name="lang" value="{code}"><input type="search" name="q" value="{query}" placeholder="{placeholder}"></form>"#,
        code = lang.code(),
        query = escape(query),
        placeholder = escape(t(lang, "search_placeholder")),
    )
}

/// Category buttons linking to each section's anchor.
pub fn category_nav(catalog: &Catalog, lang: Language, active: Option<&str>) -> String {
    let mut html = String::from(r#"<nav class="category-nav">"#);
    for category in catalog {
        let class = if active == Some(category.id.as_str()) {
            "category-link active"
        } else {
            "category-link"
        };
        let _ = write!(
            html,
            r##"<a class="{class}" href="#{id}"><span class="explore">{explore}</span><span class="title">{title}</span></a>"##,
            class = class,
            id = escape(&category.id),
            explore = escape(t(lang, "explore")),
            title = escape(category.title.resolve(lang)),
        );
    }
    html.push_str("</nav>");
    html
}

pub fn category_section(category: &Category, lang: Language, mode: CardMode) -> String {
    let mut html = format!(
        r#"<section class="category" id="{id}"><h2>{title}</h2>"#,
        id = escape(&category.id),
        title = escape(category.title.resolve(lang)),
    );
    for item in &category.items {
        html.push_str(&item_card(item, lang, mode));
    }
    html.push_str("</section>");
    html
}

/// One item. `CardMode::Edit` swaps every editable field for an input.
pub fn item_card(item: &MenuItem, lang: Language, mode: CardMode) -> String {
    let id = escape(&item.id);
    let number = item.number.as_deref().unwrap_or("");
    let mut html = format!(r#"<article class="item-card" id="item-{id}" data-item="{id}">"#);

    match mode {
        CardMode::View => {
            if !item.image.is_empty() {
                let _ = write!(
                    html,
                    r#"<img class="item-image" src="{}" alt="{}" loading="lazy">"#,
                    escape(&item.image),
                    escape(&item.name),
                );
            }
            html.push_str(r#"<div class="item-body"><h3 class="item-name">"#);
            if !number.is_empty() {
                let _ = write!(html, r#"<span class="item-number">#{}</span> "#, escape(number));
            }
            let _ = write!(
                html,
                r#"{name}</h3><p class="item-ingredients">{ingredients}</p></div><span class="item-price">{price}</span>"#,
                name = escape(&item.name),
                ingredients = escape(item.ingredients.resolve(lang)),
                price = escape(&item.price),
            );
            html.push_str(&post_button(
                &format!("/cart/{}/add", item.id),
                "add-to-order",
                t(lang, "add_to_order"),
                false,
            ));
        }
        CardMode::Edit => {
            let field = |name: &str, label_key: &'static str, value: &str| {
                format!(
                    r#"<label class="field field-{name}">{label}<input type="text" name="{name}" value="{value}"></label>"#,
                    name = name,
                    label = escape(t(lang, label_key)),
                    value = escape(value),
                )
            };
            let _ = write!(html, r#"<form class="item-edit" method="post" action="/admin/items/{}">"#, id);
            html.push_str(&field("number", "number", number));
            html.push_str(&field("name", "name", &item.name));
            html.push_str(&field("price", "price", &item.price));
            html.push_str(&field("image", "image", &item.image));
            let _ = write!(
                html,
                r#"<label class="field field-ingredients">{label}<textarea name="ingredients" lang="{code}">{text}</textarea></label><button type="submit">{save}</button></form>"#,
                label = escape(t(lang, "ingredients")),
                code = lang.code(),
                text = escape(item.ingredients.get(lang)),
                save = escape(t(lang, "save_item")),
            );
            let _ = write!(
                html,
                r#"<form class="item-upload" method="post" action="/admin/items/{id}/image" enctype="multipart/form-data"><input type="file" name="file" accept="{accept}" required><button type="submit">{upload}</button></form>"#,
                id = id,
                accept = ALLOWED_CONTENT_TYPES.join(","),
                upload = escape(t(lang, "upload_image")),
            );
        }
    }

    html.push_str("</article>");
    html
}
