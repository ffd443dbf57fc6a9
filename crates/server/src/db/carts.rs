//! Cart repository for `PostgreSQL`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use bistro_core::{CartItemId, Email, MenuItemId};

use super::{RepositoryError, as_count};
use crate::models::{Attributes, CartItem};

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: CartItemId,
    email: String,
    food_id: MenuItemId,
    name: String,
    price: Decimal,
    quantity: i32,
    attributes: Json<Attributes>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid cart owner in database: {e}"))
        })?;
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!("negative quantity {}", row.quantity))
        })?;

        Ok(Self {
            id: row.id,
            email,
            food_id: row.food_id,
            name: row.name,
            price: row.price,
            quantity,
            created_at: row.created_at,
            attributes: row.attributes.0,
        })
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the cart lines owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for(&self, owner: &Email) -> Result<Vec<CartItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT id, email, food_id, name, price, quantity, attributes, created_at
            FROM cart_items
            WHERE email = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CartItem::try_from).collect()
    }

    /// Count the cart lines owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for(&self, owner: &Email) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cart_items WHERE email = $1")
            .bind(owner)
            .fetch_one(self.pool)
            .await?;

        Ok(as_count(count))
    }

    /// Insert a cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the quantity does not fit
    /// the column, `RepositoryError::Database` if the query fails.
    pub async fn create(&self, item: &CartItem) -> Result<(), RepositoryError> {
        let quantity = i32::try_from(item.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!("quantity {} out of range", item.quantity))
        })?;

        sqlx::query(
            r"
            INSERT INTO cart_items
                (id, email, food_id, name, price, quantity, attributes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(item.id)
        .bind(&item.email)
        .bind(item.food_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(quantity)
        .bind(Json(&item.attributes))
        .bind(item.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete a cart line owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_owned(
        &self,
        id: CartItemId,
        owner: &Email,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND email = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
