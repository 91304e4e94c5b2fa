use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use ementa_menu::{Language, MenuItem};

use crate::i18n::t;
use crate::storage::{LocalStorage, CART_KEY};

/// A selected item and how many of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub item: MenuItem,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.item.unit_price() * f64::from(self.quantity)
    }
}

/// The customer's order note.
///
/// Holds at most one entry per item id, each with quantity ≥ 1. Every
/// mutation writes the whole list to local storage before returning.
pub struct CartStore {
    items: Vec<CartItem>,
    storage: Arc<dyn LocalStorage>,
}

impl CartStore {
    /// Empty cart bound to `storage`. Nothing is written until a mutation.
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { items: Vec::new(), storage }
    }

    /// Load the cart saved in `storage`. Unreadable data is dropped and the
    /// cart starts empty.
    pub fn restore(storage: Arc<dyn LocalStorage>) -> Self {
        let items = match storage.get_item(CART_KEY) {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => normalize(items),
                Err(e) => {
                    warn!(error = %e, "discarding unreadable saved cart");
                    Vec::new()
                }
            },
        };
        Self { items, storage }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|c| c.quantity).sum()
    }

    /// Increment the entry for this item, or append it with quantity 1.
    pub fn add(&mut self, item: &MenuItem) {
        match self.items.iter_mut().find(|c| c.item.id == item.id) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(1),
            None => self.items.push(CartItem { item: item.clone(), quantity: 1 }),
        }
        self.persist();
    }

    /// Set quantity to `max(1, current + delta)`. Never removes.
    pub fn update_quantity(&mut self, id: &str, delta: i64) {
        if let Some(entry) = self.items.iter_mut().find(|c| c.item.id == id) {
            let next = i64::from(entry.quantity)
                .saturating_add(delta)
                .clamp(1, i64::from(u32::MAX));
            entry.quantity = next as u32;
        }
        self.persist();
    }

    pub fn remove(&mut self, id: &str) {
        self.items.retain(|c| c.item.id != id);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Sum of quantity × price. Unparsable prices count as 0.
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Plain-text summary to read out on the phone.
    pub fn order_note(&self, lang: Language) -> String {
        let mut lines: Vec<String> = self
            .items
            .iter()
            .map(|c| match &c.item.number {
                Some(n) => format!("{}x #{} {} — {}", c.quantity, n, c.item.name, c.item.price),
                None => format!("{}x {} — {}", c.quantity, c.item.name, c.item.price),
            })
            .collect();
        lines.push(format!("{}: {:.2}€", t(lang, "total"), self.total()));
        lines.join("\n")
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.items) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "cart not serializable");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(CART_KEY, &raw) {
            warn!(error = %e, "cart not saved");
        }
    }
}

/// Merge repeated ids and lift zero quantities to 1.
fn normalize(items: Vec<CartItem>) -> Vec<CartItem> {
    let mut out: Vec<CartItem> = Vec::with_capacity(items.len());
    for mut entry in items {
        entry.quantity = entry.quantity.max(1);
        match out.iter_mut().find(|c| c.item.id == entry.item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(entry.quantity),
            None => out.push(entry),
        }
    }
    out
}
