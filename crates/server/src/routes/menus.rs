//! Menu routes. Reads are public; writes need an admin.

use axum::{Json, extract::State};
use tracing::instrument;

use bistro_core::MenuItemId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{InsertResult, MenuDeleteResult, MenuItem, MenuItemInput, UpdateResult};
use crate::state::AppState;

use super::extract::{AppJson, AppPath};

/// `GET /menus`
#[instrument(skip_all)]
pub async fn list_menu_items(State(state): State<AppState>) -> Result<Json<Vec<MenuItem>>> {
    Ok(Json(state.store().list_menu_items().await?))
}

/// `GET /menus/{id}`
#[instrument(skip_all, fields(menu_item_id = %id))]
pub async fn get_menu_item(
    State(state): State<AppState>,
    AppPath(id): AppPath<MenuItemId>,
) -> Result<Json<MenuItem>> {
    state
        .store()
        .find_menu_item(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("menu item".to_string()))
}

/// `POST /menus`
#[instrument(skip_all)]
pub async fn create_menu_item(
    RequireAdmin(caller): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<MenuItemInput>,
) -> Result<Json<InsertResult<MenuItemId>>> {
    input.validate()?;
    let item = MenuItem::new(input);
    state.store().insert_menu_item(&item).await?;
    tracing::info!(by = %caller.email, menu_item_id = %item.id, name = %item.name, "Menu item created");
    Ok(Json(InsertResult::inserted(item.id)))
}

/// `PATCH /menus/{id}`
///
/// Replaces name, price and category; extra fields are merged into the
/// existing ones.
#[instrument(skip_all, fields(menu_item_id = %id))]
pub async fn update_menu_item(
    RequireAdmin(caller): RequireAdmin,
    State(state): State<AppState>,
    AppPath(id): AppPath<MenuItemId>,
    AppJson(input): AppJson<MenuItemInput>,
) -> Result<Json<UpdateResult>> {
    input.validate()?;
    let result = state
        .store()
        .update_menu_item(id, &input.sanitized())
        .await?;
    tracing::info!(
        by = %caller.email,
        matched = result.matched_count,
        modified = result.modified_count,
        "Menu item updated"
    );
    Ok(Json(result))
}

/// `DELETE /menus/{id}` - delete an item and every cart line pointing at it.
#[instrument(skip_all, fields(menu_item_id = %id))]
pub async fn delete_menu_item(
    RequireAdmin(caller): RequireAdmin,
    State(state): State<AppState>,
    AppPath(id): AppPath<MenuItemId>,
) -> Result<Json<MenuDeleteResult>> {
    let result = state.store().delete_menu_item(id).await?;
    tracing::info!(
        by = %caller.email,
        deleted_count = result.deleted_count,
        cart_items_deleted = result.cart_items_deleted,
        "Menu item deleted"
    );
    Ok(Json(result))
}
