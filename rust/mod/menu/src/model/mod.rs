pub mod catalog;
pub mod item;
pub mod language;
pub mod localized;

pub use catalog::{Catalog, Category};
pub use item::{parse_price, ItemPatch, MenuItem};
pub use language::Language;
pub use localized::LocalizedText;
