use serde::{Deserialize, Serialize};

use super::LocalizedText;

/// One dish on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,

    /// Display number printed next to the name (e.g. "07").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    pub name: String,

    /// Free-form price label, typically `"X.XX€"`.
    pub price: String,

    #[serde(default)]
    pub ingredients: LocalizedText,

    /// Image URL or `data:` reference.
    #[serde(default)]
    pub image: String,
}

impl MenuItem {
    pub fn unit_price(&self) -> f64 {
        parse_price(&self.price)
    }

    /// Apply a patch in place. Absent fields are left untouched.
    pub fn apply(&mut self, patch: &ItemPatch) {
        if let Some(number) = &patch.number {
            self.number = if number.is_empty() { None } else { Some(number.clone()) };
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(price) = &patch.price {
            self.price = price.clone();
        }
        if let Some(image) = &patch.image {
            self.image = image.clone();
        }
    }
}

/// Replacement values for the editable scalar fields of a [`MenuItem`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ItemPatch {
    pub fn number(v: impl Into<String>) -> Self {
        Self { number: Some(v.into()), ..Default::default() }
    }

    pub fn name(v: impl Into<String>) -> Self {
        Self { name: Some(v.into()), ..Default::default() }
    }

    pub fn price(v: impl Into<String>) -> Self {
        Self { price: Some(v.into()), ..Default::default() }
    }

    pub fn image(v: impl Into<String>) -> Self {
        Self { image: Some(v.into()), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.number.is_none() && self.name.is_none() && self.price.is_none() && self.image.is_none()
    }
}

/// Numeric value of a price label.
///
/// Every character that is not an ASCII digit or `.` is dropped and the rest
/// parsed as a decimal. Anything unparsable counts as 0.
pub fn parse_price(label: &str) -> f64 {
    let digits: String = label
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> MenuItem {
        MenuItem {
            id: "p1".into(),
            number: Some("07".into()),
            name: "Margherita".into(),
            price: "8.50€".into(),
            ingredients: LocalizedText::uniform("tomate"),
            image: String::new(),
        }
    }

    #[test]
    fn parse_price_strips_currency() {
        assert_eq!(parse_price("10.00€"), 10.0);
        assert_eq!(parse_price("€ 9.50"), 9.5);
        assert_eq!(parse_price("12"), 12.0);
    }

    #[test]
    fn malformed_price_is_zero() {
        assert_eq!(parse_price(""), 0.0);
        assert_eq!(parse_price("grátis"), 0.0);
        assert_eq!(parse_price("1.2.3€"), 0.0);
    }

    #[test]
    fn patch_replaces_only_given_fields() {
        let mut it = item();
        it.apply(&ItemPatch::price("9.00€"));
        assert_eq!(it.price, "9.00€");
        assert_eq!(it.name, "Margherita");
        assert_eq!(it.number.as_deref(), Some("07"));
    }

    #[test]
    fn empty_number_clears_it() {
        let mut it = item();
        it.apply(&ItemPatch::number(""));
        assert!(it.number.is_none());
    }

    #[test]
    fn number_omitted_from_json_when_absent() {
        let mut it = item();
        it.number = None;
        let json = serde_json::to_value(&it).unwrap();
        assert!(json.get("number").is_none());
    }
}
