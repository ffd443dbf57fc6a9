//! Cart item documents.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bistro_core::{CartItemId, Email, MenuItemId};

use super::{Attributes, InvalidInput, MAX_QUANTITY, check_price, strip_reserved};

const RESERVED: &[&str] = &[
    "_id",
    "email",
    "foodId",
    "name",
    "price",
    "quantity",
    "createdAt",
];

/// A line in a user's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: CartItemId,
    /// Owner of the line.
    pub email: Email,
    /// Menu item this line refers to.
    pub food_id: MenuItemId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// Payload for `POST /carts`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    /// Optional; when present it must match the caller.
    #[serde(default)]
    pub email: Option<Email>,
    pub food_id: MenuItemId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(flatten)]
    pub attributes: Attributes,
}

const fn default_quantity() -> u32 {
    1
}

impl NewCartItem {
    /// Check that the price is not negative and the quantity is in
    /// `1..=MAX_QUANTITY`.
    ///
    /// # Errors
    ///
    /// The first offending field.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        check_price(self.price)?;
        if !(1..=MAX_QUANTITY).contains(&self.quantity) {
            return Err(InvalidInput::QuantityOutOfRange);
        }
        Ok(())
    }
}

impl CartItem {
    /// Build a cart line owned by `owner`.
    #[must_use]
    pub fn new(owner: Email, input: NewCartItem) -> Self {
        Self {
            id: CartItemId::generate(),
            email: owner,
            food_id: input.food_id,
            name: input.name,
            price: input.price,
            quantity: input.quantity,
            created_at: Utc::now(),
            attributes: strip_reserved(input.attributes, RESERVED),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_new_cart_item_defaults_quantity() {
        let food_id = MenuItemId::generate();
        let input: NewCartItem = serde_json::from_value(json!({
            "foodId": food_id,
            "name": "Caesar Salad",
            "price": 9.5,
            "image": "salad.png"
        }))
        .unwrap();

        assert_eq!(input.quantity, 1);
        assert_eq!(input.price, Decimal::new(95, 1));
        assert!(input.email.is_none());

        let owner = Email::parse("guest@bistro.example").unwrap();
        let item = CartItem::new(owner.clone(), input);
        assert_eq!(item.email, owner);
        assert_eq!(item.food_id, food_id);
        assert_eq!(item.attributes.get("image"), Some(&json!("salad.png")));
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let parse = |price: f64, quantity: u64| -> NewCartItem {
            serde_json::from_value(json!({
                "foodId": MenuItemId::generate(),
                "name": "Soup",
                "price": price,
                "quantity": quantity
            }))
            .unwrap()
        };

        assert!(parse(0.0, 1).validate().is_ok());
        assert!(parse(4.25, u64::from(MAX_QUANTITY)).validate().is_ok());
        assert_eq!(parse(-1.0, 1).validate(), Err(InvalidInput::NegativePrice));
        assert_eq!(
            parse(4.25, 0).validate(),
            Err(InvalidInput::QuantityOutOfRange)
        );
        assert_eq!(
            parse(4.25, 3_000_000_000).validate(),
            Err(InvalidInput::QuantityOutOfRange)
        );
    }

    #[test]
    fn test_price_serializes_as_number() {
        let input: NewCartItem = serde_json::from_value(json!({
            "foodId": MenuItemId::generate(),
            "name": "Soup",
            "price": 4.25
        }))
        .unwrap();
        let item = CartItem::new(Email::parse("a@b.c").unwrap(), input);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["price"], json!(4.25));
        assert_eq!(value["quantity"], json!(1));
    }
}
