//! Menu item documents.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bistro_core::MenuItemId;

use super::{Attributes, InvalidInput, check_price, strip_reserved};

const RESERVED: &[&str] = &["_id", "name", "price", "category", "createdAt"];

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: MenuItemId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    pub created_at: DateTime<Utc>,
    /// Recipe, image URL and any other descriptive fields.
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// Payload for creating (`POST /menus`) or updating (`PATCH /menus/{id}`) a
/// menu item. On update the typed fields are replaced and `attributes` are
/// merged into the stored ones.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuItemInput {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl MenuItemInput {
    /// Drop extra fields that would shadow typed ones.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.attributes = strip_reserved(self.attributes, RESERVED);
        self
    }

    /// # Errors
    ///
    /// `NegativePrice` when the price is below zero.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        check_price(self.price)
    }
}

impl MenuItem {
    #[must_use]
    pub fn new(input: MenuItemInput) -> Self {
        let input = input.sanitized();
        Self {
            id: MenuItemId::generate(),
            name: input.name,
            price: input.price,
            category: input.category,
            created_at: Utc::now(),
            attributes: input.attributes,
        }
    }

    /// Apply an update in place. Returns whether anything changed.
    pub fn apply(&mut self, input: &MenuItemInput) -> bool {
        let mut merged = self.attributes.clone();
        for (key, value) in &input.attributes {
            merged.insert(key.clone(), value.clone());
        }

        let changed = self.name != input.name
            || self.price != input.price
            || self.category != input.category
            || self.attributes != merged;

        self.name.clone_from(&input.name);
        self.price = input.price;
        self.category.clone_from(&input.category);
        self.attributes = merged;

        changed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn input(value: serde_json::Value) -> MenuItemInput {
        serde_json::from_value::<MenuItemInput>(value)
            .unwrap()
            .sanitized()
    }

    #[test]
    fn test_apply_merges_attributes() {
        let mut item = MenuItem::new(input(json!({
            "name": "Ramen",
            "price": 12,
            "category": "soup",
            "recipe": "broth",
            "image": "ramen.png"
        })));

        let changed = item.apply(&input(json!({
            "name": "Ramen",
            "price": 13.5,
            "category": "soup",
            "recipe": "rich broth"
        })));

        assert!(changed);
        assert_eq!(item.price, Decimal::new(135, 1));
        assert_eq!(item.attributes.get("recipe"), Some(&json!("rich broth")));
        assert_eq!(item.attributes.get("image"), Some(&json!("ramen.png")));
    }

    #[test]
    fn test_apply_same_values_is_not_a_change() {
        let body = json!({ "name": "Tea", "price": 2, "category": "drinks" });
        let mut item = MenuItem::new(input(body.clone()));
        assert!(!item.apply(&input(body)));
    }

    #[test]
    fn test_reserved_keys_are_dropped() {
        let item = MenuItem::new(input(json!({
            "name": "Tea",
            "price": 2,
            "category": "drinks",
            "_id": "spoofed"
        })));
        assert!(!item.attributes.contains_key("_id"));
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let body = |price: f64| input(json!({ "name": "Tea", "price": price, "category": "drinks" }));
        assert!(body(0.0).validate().is_ok());
        assert!(body(2.5).validate().is_ok());
        assert_eq!(body(-0.5).validate(), Err(InvalidInput::NegativePrice));
    }
}
