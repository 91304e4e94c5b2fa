use std::borrow::Cow;

use crate::model::{Catalog, Category, MenuItem};

/// Filter the catalog by a free-text query.
///
/// An item matches when its name or the ingredient text in any language
/// contains the query, ignoring case. Categories left without items are
/// dropped. An empty query returns the catalog itself, borrowed.
pub fn filter_catalog<'a>(catalog: &'a Catalog, query: &str) -> Cow<'a, Catalog> {
    if query.is_empty() {
        return Cow::Borrowed(catalog);
    }
    let needle = query.to_lowercase();

    let categories = catalog
        .iter()
        .filter_map(|category| {
            let items: Vec<MenuItem> = category
                .items
                .iter()
                .filter(|item| item_matches(item, &needle))
                .cloned()
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(Category {
                    id: category.id.clone(),
                    title: category.title.clone(),
                    items,
                })
            }
        })
        .collect();

    Cow::Owned(Catalog::new(categories))
}

/// `needle` must already be lowercase.
fn item_matches(item: &MenuItem, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle)
        || item
            .ingredients
            .values()
            .any(|text| text.to_lowercase().contains(needle))
}
