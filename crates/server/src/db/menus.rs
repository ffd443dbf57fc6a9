//! Menu repository for `PostgreSQL`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use bistro_core::MenuItemId;

use super::{RepositoryError, as_count};
use crate::models::{Attributes, MenuDeleteResult, MenuItem, MenuItemInput, UpdateResult};

#[derive(sqlx::FromRow)]
struct MenuItemRow {
    id: MenuItemId,
    name: String,
    price: Decimal,
    category: String,
    attributes: Json<Attributes>,
    created_at: DateTime<Utc>,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            category: row.category,
            created_at: row.created_at,
            attributes: row.attributes.0,
        }
    }
}

/// Repository for menu database operations.
pub struct MenuRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MenuRepository<'a> {
    /// Create a new menu repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the whole menu.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r"
            SELECT id, name, price, category, attributes, created_at
            FROM menu_items
            ORDER BY created_at ASC, id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    /// Get a menu item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            r"
            SELECT id, name, price, category, attributes, created_at
            FROM menu_items
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(MenuItem::from))
    }

    /// Insert a menu item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, item: &MenuItem) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO menu_items (id, name, price, category, attributes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.category)
        .bind(Json(&item.attributes))
        .bind(item.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Replace the typed fields of a menu item and merge its attributes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: MenuItemId,
        input: &MenuItemInput,
    ) -> Result<UpdateResult, RepositoryError> {
        let (matched, modified): (i64, i64) = sqlx::query_as(
            r"
            WITH target AS (
                SELECT id FROM menu_items WHERE id = $1
            ), updated AS (
                UPDATE menu_items m
                SET name = $2, price = $3, category = $4, attributes = m.attributes || $5
                WHERE m.id = $1
                  AND (m.name, m.price, m.category, m.attributes)
                      IS DISTINCT FROM ($2, $3, $4, m.attributes || $5)
                RETURNING m.id
            )
            SELECT (SELECT COUNT(*) FROM target), (SELECT COUNT(*) FROM updated)
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.category)
        .bind(Json(&input.attributes))
        .fetch_one(self.pool)
        .await?;

        Ok(UpdateResult {
            matched_count: as_count(matched),
            modified_count: as_count(modified),
        })
    }

    /// Delete a menu item and the cart lines referencing it in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either statement or the commit
    /// fails; nothing is deleted in that case.
    pub async fn delete_cascading(
        &self,
        id: MenuItemId,
    ) -> Result<MenuDeleteResult, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cart_items = sqlx::query("DELETE FROM cart_items WHERE food_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let menu_items = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(MenuDeleteResult {
            deleted_count: menu_items.rows_affected(),
            cart_items_deleted: cart_items.rows_affected(),
        })
    }

    /// Number of menu items, used by the seeding command.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM menu_items")
            .fetch_one(self.pool)
            .await?;

        Ok(as_count(count))
    }
}
