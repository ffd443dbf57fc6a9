//! Store traits.
//!
//! One trait per collection, plus the [`Store`] umbrella that `AppState`
//! holds as `Arc<dyn Store>`. Each method is a single storage operation.

use async_trait::async_trait;

use bistro_core::{CartItemId, Email, MenuItemId, Role, UserId};

use super::RepositoryError;
use crate::models::{CartItem, MenuDeleteResult, MenuItem, MenuItemInput, UpdateResult, User};

/// User collection operations.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, oldest first.
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Insert a user.
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError>;

    /// Overwrite a user's role.
    async fn set_user_role(&self, id: UserId, role: Role)
    -> Result<UpdateResult, RepositoryError>;

    /// Delete a user. Returns the number of deleted records.
    async fn delete_user(&self, id: UserId) -> Result<u64, RepositoryError>;
}

/// Cart collection operations.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Cart lines owned by `owner`, oldest first.
    async fn list_cart_items(&self, owner: &Email) -> Result<Vec<CartItem>, RepositoryError>;

    /// Number of cart lines owned by `owner`.
    ///
    /// Always equals `list_cart_items(owner).len()`.
    async fn count_cart_items(&self, owner: &Email) -> Result<u64, RepositoryError>;

    async fn insert_cart_item(&self, item: &CartItem) -> Result<(), RepositoryError>;

    /// Delete a cart line if it belongs to `owner`.
    async fn delete_cart_item(
        &self,
        id: CartItemId,
        owner: &Email,
    ) -> Result<u64, RepositoryError>;
}

/// Menu collection operations.
#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn list_menu_items(&self) -> Result<Vec<MenuItem>, RepositoryError>;

    async fn find_menu_item(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError>;

    async fn insert_menu_item(&self, item: &MenuItem) -> Result<(), RepositoryError>;

    async fn update_menu_item(
        &self,
        id: MenuItemId,
        input: &MenuItemInput,
    ) -> Result<UpdateResult, RepositoryError>;

    /// Delete a menu item and every cart line whose `food_id` refers to it.
    ///
    /// Implementations must make the two deletions atomic.
    async fn delete_menu_item(&self, id: MenuItemId) -> Result<MenuDeleteResult, RepositoryError>;
}

/// Everything the HTTP layer needs from storage.
#[async_trait]
pub trait Store: UserStore + CartStore + MenuStore {
    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
