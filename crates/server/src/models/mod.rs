//! Domain models and JSON response shapes.
//!
//! Documents carry a few typed fields plus an open map of extra fields that
//! clients may attach (profile data, recipe text, image URLs, ...). Extra
//! fields are flattened into the document's JSON on the wire and stored in a
//! JSONB column.

pub mod cart;
pub mod menu;
pub mod user;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub use cart::{CartItem, NewCartItem};
pub use menu::{MenuItem, MenuItemInput};
pub use user::{NewUser, User};

/// Open set of extra document fields.
pub type Attributes = Map<String, Value>;

/// Largest quantity a cart line can hold (a Postgres `INTEGER`).
pub const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// A payload value outside what a document may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("price must not be negative")]
    NegativePrice,
    #[error("quantity must be between 1 and {}", MAX_QUANTITY)]
    QuantityOutOfRange,
}

pub(crate) fn check_price(price: Decimal) -> Result<(), InvalidInput> {
    if price < Decimal::ZERO {
        return Err(InvalidInput::NegativePrice);
    }
    Ok(())
}

/// Remove keys that collide with typed document fields.
///
/// Flattened maps would otherwise serialize a second `email` or `_id` next to
/// the real one.
pub(crate) fn strip_reserved(mut attributes: Attributes, reserved: &[&str]) -> Attributes {
    for key in reserved {
        attributes.remove(*key);
    }
    attributes
}

/// Result of an insert.
///
/// `message` is only set when nothing was inserted (e.g. the user exists).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult<I> {
    pub inserted_id: Option<I>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<I> InsertResult<I> {
    #[must_use]
    pub const fn inserted(id: I) -> Self {
        Self {
            inserted_id: Some(id),
            message: None,
        }
    }

    #[must_use]
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            inserted_id: None,
            message: Some(message.into()),
        }
    }
}

/// Result of an update: how many documents matched and how many changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Result of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Result of deleting a menu item together with the cart items referencing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDeleteResult {
    pub deleted_count: u64,
    pub cart_items_deleted: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_insert_result_shapes() {
        let inserted = serde_json::to_value(InsertResult::inserted(7)).unwrap();
        assert_eq!(inserted, json!({ "insertedId": 7 }));

        let skipped = serde_json::to_value(InsertResult::<i32>::skipped("user already exists"))
            .unwrap();
        assert_eq!(
            skipped,
            json!({ "insertedId": null, "message": "user already exists" })
        );
    }

    #[test]
    fn test_strip_reserved() {
        let attrs = json!({ "email": "x@y.z", "_id": 1, "photo": "a.png" });
        let Value::Object(map) = attrs else {
            unreachable!()
        };
        let stripped = strip_reserved(map, &["email", "_id"]);
        assert_eq!(stripped.len(), 1);
        assert!(stripped.contains_key("photo"));
    }
}
