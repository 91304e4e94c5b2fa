//! Menu bundled into the binary, used until a stored catalog replaces it.

use crate::model::Catalog;

const DEFAULT_MENU_JSON: &str = include_str!("../data/default_menu.json");

/// Parse the bundled menu.
pub fn default_catalog() -> Result<Catalog, serde_json::Error> {
    serde_json::from_str(DEFAULT_MENU_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;

    #[test]
    fn bundled_menu_parses() {
        let catalog = default_catalog().unwrap();
        let ids: Vec<&str> = catalog.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            ["entradas", "massas", "pizzas-classicas", "pizzas-especiais", "saladas", "especialidades"]
        );
        assert_eq!(catalog.item_count(), 48);
    }

    #[test]
    fn bundled_item_ids_are_unique() {
        assert!(default_catalog().unwrap().duplicate_item_ids().is_empty());
    }

    #[test]
    fn bundled_text_covers_every_language() {
        let catalog = default_catalog().unwrap();
        for category in &catalog {
            assert!(category.title.missing().is_empty(), "category {}", category.id);
            for item in &category.items {
                assert!(item.number.is_some(), "item {} has no number", item.id);
                for lang in Language::ALL {
                    assert!(!item.ingredients.resolve(lang).is_empty(), "item {}", item.id);
                }
            }
        }
    }
}
