//! In-memory [`Store`].
//!
//! Keeps each collection in a `Vec` (insertion order doubles as creation
//! order) behind one `RwLock`. Used by the test suites in place of Postgres.

use async_trait::async_trait;
use tokio::sync::RwLock;

use bistro_core::{CartItemId, Email, MenuItemId, Role, UserId};

use super::{CartStore, MenuStore, RepositoryError, Store, UserStore};
use crate::models::{CartItem, MenuDeleteResult, MenuItem, MenuItemInput, UpdateResult, User};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    cart_items: Vec<CartItem>,
    menu_items: Vec<MenuItem>,
}

/// Process-local store with the same observable behavior as `PgStore`.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let data = self.inner.read().await;
        Ok(data.users.iter().find(|u| &u.email == email).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        let mut data = self.inner.write().await;
        if data.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        data.users.push(user.clone());
        Ok(())
    }

    async fn set_user_role(
        &self,
        id: UserId,
        role: Role,
    ) -> Result<UpdateResult, RepositoryError> {
        let mut data = self.inner.write().await;
        let Some(user) = data.users.iter_mut().find(|u| u.id == id) else {
            return Ok(UpdateResult::default());
        };

        let modified = user.role != role;
        user.role = role;

        Ok(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete_user(&self, id: UserId) -> Result<u64, RepositoryError> {
        let mut data = self.inner.write().await;
        let before = data.users.len();
        data.users.retain(|u| u.id != id);
        Ok(count(before - data.users.len()))
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn list_cart_items(&self, owner: &Email) -> Result<Vec<CartItem>, RepositoryError> {
        let data = self.inner.read().await;
        Ok(data
            .cart_items
            .iter()
            .filter(|item| &item.email == owner)
            .cloned()
            .collect())
    }

    async fn count_cart_items(&self, owner: &Email) -> Result<u64, RepositoryError> {
        let data = self.inner.read().await;
        Ok(count(
            data.cart_items
                .iter()
                .filter(|item| &item.email == owner)
                .count(),
        ))
    }

    async fn insert_cart_item(&self, item: &CartItem) -> Result<(), RepositoryError> {
        self.inner.write().await.cart_items.push(item.clone());
        Ok(())
    }

    async fn delete_cart_item(
        &self,
        id: CartItemId,
        owner: &Email,
    ) -> Result<u64, RepositoryError> {
        let mut data = self.inner.write().await;
        let before = data.cart_items.len();
        data.cart_items
            .retain(|item| !(item.id == id && &item.email == owner));
        Ok(count(before - data.cart_items.len()))
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn list_menu_items(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        Ok(self.inner.read().await.menu_items.clone())
    }

    async fn find_menu_item(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let data = self.inner.read().await;
        Ok(data.menu_items.iter().find(|m| m.id == id).cloned())
    }

    async fn insert_menu_item(&self, item: &MenuItem) -> Result<(), RepositoryError> {
        self.inner.write().await.menu_items.push(item.clone());
        Ok(())
    }

    async fn update_menu_item(
        &self,
        id: MenuItemId,
        input: &MenuItemInput,
    ) -> Result<UpdateResult, RepositoryError> {
        let mut data = self.inner.write().await;
        let Some(item) = data.menu_items.iter_mut().find(|m| m.id == id) else {
            return Ok(UpdateResult::default());
        };

        let modified = item.apply(input);

        Ok(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete_menu_item(&self, id: MenuItemId) -> Result<MenuDeleteResult, RepositoryError> {
        // One write guard covers both collections.
        let mut data = self.inner.write().await;

        let carts_before = data.cart_items.len();
        data.cart_items.retain(|item| item.food_id != id);
        let cart_items_deleted = count(carts_before - data.cart_items.len());

        let menu_before = data.menu_items.len();
        data.menu_items.retain(|m| m.id != id);
        let deleted_count = count(menu_before - data.menu_items.len());

        Ok(MenuDeleteResult {
            deleted_count,
            cart_items_deleted,
        })
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::models::{NewCartItem, NewUser};

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    fn user(address: &str) -> User {
        User::from_signup(serde_json::from_value::<NewUser>(json!({ "email": address })).unwrap())
    }

    fn menu_item(name: &str) -> MenuItem {
        MenuItem::new(
            serde_json::from_value(json!({ "name": name, "price": 10, "category": "main" }))
                .unwrap(),
        )
    }

    fn cart_line(owner: &str, food: MenuItemId) -> CartItem {
        let input: NewCartItem = serde_json::from_value(json!({
            "foodId": food,
            "name": "line",
            "price": 10
        }))
        .unwrap();
        CartItem::new(email(owner), input)
    }

    #[tokio::test]
    async fn test_insert_user_rejects_duplicate_email() {
        let store = MemoryStore::new();
        store.insert_user(&user("a@bistro.example")).await.unwrap();

        let err = store
            .insert_user(&user("A@Bistro.Example"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_role_reports_matched_and_modified() {
        let store = MemoryStore::new();
        let u = user("a@bistro.example");
        store.insert_user(&u).await.unwrap();

        let first = store.set_user_role(u.id, Role::Admin).await.unwrap();
        assert_eq!((first.matched_count, first.modified_count), (1, 1));

        let again = store.set_user_role(u.id, Role::Admin).await.unwrap();
        assert_eq!((again.matched_count, again.modified_count), (1, 0));

        let missing = store
            .set_user_role(UserId::generate(), Role::Admin)
            .await
            .unwrap();
        assert_eq!(missing, UpdateResult::default());
    }

    #[tokio::test]
    async fn test_count_matches_list() {
        let store = MemoryStore::new();
        let food = MenuItemId::generate();
        for owner in ["a@x.io", "a@x.io", "b@x.io"] {
            store.insert_cart_item(&cart_line(owner, food)).await.unwrap();
        }

        for owner in ["a@x.io", "b@x.io", "c@x.io"] {
            let owner = email(owner);
            let listed = store.list_cart_items(&owner).await.unwrap();
            let counted = store.count_cart_items(&owner).await.unwrap();
            assert_eq!(counted, count(listed.len()));
        }
    }

    #[tokio::test]
    async fn test_delete_cart_item_is_owner_scoped() {
        let store = MemoryStore::new();
        let line = cart_line("a@x.io", MenuItemId::generate());
        store.insert_cart_item(&line).await.unwrap();

        assert_eq!(
            store.delete_cart_item(line.id, &email("b@x.io")).await.unwrap(),
            0
        );
        assert_eq!(
            store.delete_cart_item(line.id, &email("a@x.io")).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_delete_menu_item_cascades_only_matching_lines() {
        let store = MemoryStore::new();
        let soup = menu_item("Soup");
        let salad = menu_item("Salad");
        store.insert_menu_item(&soup).await.unwrap();
        store.insert_menu_item(&salad).await.unwrap();

        store.insert_cart_item(&cart_line("a@x.io", soup.id)).await.unwrap();
        store.insert_cart_item(&cart_line("b@x.io", soup.id)).await.unwrap();
        store.insert_cart_item(&cart_line("a@x.io", salad.id)).await.unwrap();

        let result = store.delete_menu_item(soup.id).await.unwrap();
        assert_eq!(result.deleted_count, 1);
        assert_eq!(result.cart_items_deleted, 2);

        let remaining = store.list_cart_items(&email("a@x.io")).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].food_id, salad.id);
        assert_eq!(store.list_menu_items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_menu_item() {
        let store = MemoryStore::new();
        let item = menu_item("Tea");
        store.insert_menu_item(&item).await.unwrap();

        let input: MenuItemInput = serde_json::from_value(json!({
            "name": "Green Tea",
            "price": 3.5,
            "category": "drinks"
        }))
        .unwrap();
        let result = store.update_menu_item(item.id, &input).await.unwrap();
        assert_eq!((result.matched_count, result.modified_count), (1, 1));

        let stored = store.find_menu_item(item.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Green Tea");
        assert_eq!(stored.price, Decimal::new(35, 1));
    }
}
