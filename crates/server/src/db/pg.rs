//! `PostgreSQL`-backed [`Store`].

use async_trait::async_trait;
use sqlx::PgPool;

use bistro_core::{CartItemId, Email, MenuItemId, Role, UserId};

use super::{
    CartRepository, CartStore, MenuRepository, MenuStore, RepositoryError, Store, UserRepository,
    UserStore,
};
use crate::models::{CartItem, MenuDeleteResult, MenuItem, MenuItemInput, UpdateResult, User};

/// Production store over a shared connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        UserRepository::new(&self.pool).list().await
    }

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        UserRepository::new(&self.pool).get_by_email(email).await
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        UserRepository::new(&self.pool).create(user).await
    }

    async fn set_user_role(
        &self,
        id: UserId,
        role: Role,
    ) -> Result<UpdateResult, RepositoryError> {
        UserRepository::new(&self.pool).set_role(id, role).await
    }

    async fn delete_user(&self, id: UserId) -> Result<u64, RepositoryError> {
        UserRepository::new(&self.pool).delete(id).await
    }
}

#[async_trait]
impl CartStore for PgStore {
    async fn list_cart_items(&self, owner: &Email) -> Result<Vec<CartItem>, RepositoryError> {
        CartRepository::new(&self.pool).list_for(owner).await
    }

    async fn count_cart_items(&self, owner: &Email) -> Result<u64, RepositoryError> {
        CartRepository::new(&self.pool).count_for(owner).await
    }

    async fn insert_cart_item(&self, item: &CartItem) -> Result<(), RepositoryError> {
        CartRepository::new(&self.pool).create(item).await
    }

    async fn delete_cart_item(
        &self,
        id: CartItemId,
        owner: &Email,
    ) -> Result<u64, RepositoryError> {
        CartRepository::new(&self.pool).delete_owned(id, owner).await
    }
}

#[async_trait]
impl MenuStore for PgStore {
    async fn list_menu_items(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        MenuRepository::new(&self.pool).list().await
    }

    async fn find_menu_item(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        MenuRepository::new(&self.pool).get(id).await
    }

    async fn insert_menu_item(&self, item: &MenuItem) -> Result<(), RepositoryError> {
        MenuRepository::new(&self.pool).create(item).await
    }

    async fn update_menu_item(
        &self,
        id: MenuItemId,
        input: &MenuItemInput,
    ) -> Result<UpdateResult, RepositoryError> {
        MenuRepository::new(&self.pool).update(id, input).await
    }

    async fn delete_menu_item(&self, id: MenuItemId) -> Result<MenuDeleteResult, RepositoryError> {
        MenuRepository::new(&self.pool).delete_cascading(id).await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
