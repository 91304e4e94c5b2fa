use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{LocalizedText, MenuItem};

/// A titled group of items; `id` doubles as the page anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: LocalizedText,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// The whole menu in display order.
///
/// Serialized as a bare JSON array of categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    pub fn find_item(&self, id: &str) -> Option<&MenuItem> {
        self.items().find(|item| item.id == id)
    }

    pub fn find_item_mut(&mut self, id: &str) -> Option<&mut MenuItem> {
        self.categories
            .iter_mut()
            .flat_map(|c| c.items.iter_mut())
            .find(|item| item.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Item ids that occur more than once, in first-repeat order.
    ///
    /// Uniqueness is assumed throughout but not enforced on load or save.
    pub fn duplicate_item_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dups = Vec::new();
        for item in self.items() {
            if !seen.insert(item.id.as_str()) && !dups.contains(&item.id) {
                dups.push(item.id.clone());
            }
        }
        dups
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> MenuItem {
        MenuItem {
            id: id.into(),
            number: None,
            name: id.to_uppercase(),
            price: "1.00€".into(),
            ingredients: LocalizedText::default(),
            image: String::new(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Category {
                id: "a".into(),
                title: LocalizedText::uniform("A"),
                items: vec![item("x"), item("y")],
            },
            Category {
                id: "b".into(),
                title: LocalizedText::uniform("B"),
                items: vec![item("z")],
            },
        ])
    }

    #[test]
    fn serializes_as_bare_array() {
        let json = serde_json::to_value(catalog()).unwrap();
        assert!(json.is_array());
        assert_eq!(json[1]["items"][0]["id"], "z");
        let back: Catalog = serde_json::from_value(json).unwrap();
        assert_eq!(back, catalog());
    }

    #[test]
    fn find_item_across_categories() {
        let mut c = catalog();
        assert_eq!(c.item_count(), 3);
        assert_eq!(c.find_item("z").unwrap().name, "Z");
        c.find_item_mut("y").unwrap().price = "2.00€".into();
        assert_eq!(c.find_item("y").unwrap().price, "2.00€");
        assert!(c.find_item("nope").is_none());
    }

    #[test]
    fn duplicates_reported_once() {
        let mut c = catalog();
        c.categories[1].items.push(item("x"));
        c.categories[1].items.push(item("x"));
        assert_eq!(c.duplicate_item_ids(), vec!["x".to_string()]);
        assert!(catalog().duplicate_item_ids().is_empty());
    }
}
