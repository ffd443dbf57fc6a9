//! Cart routes.
//!
//! Listing and counting are public and keyed by the `email` query parameter.
//! Adding and removing lines require a token and act on the token's email.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use bistro_core::{CartItemId, Email};

use crate::error::Result;
use crate::middleware::{RequireAuth, Rejection};
use crate::models::{CartItem, DeleteResult, InsertResult, NewCartItem};
use crate::state::AppState;

use super::extract::{AppJson, AppPath, AppQuery};

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub email: Option<String>,
}

impl OwnerQuery {
    /// The owner to filter by. A missing or unparseable email matches no
    /// cart lines.
    fn owner(&self) -> Option<Email> {
        self.email.as_deref().and_then(|raw| Email::parse(raw).ok())
    }
}

/// `GET /carts?email=` - cart lines for an owner.
#[instrument(skip_all)]
pub async fn list_cart_items(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<OwnerQuery>,
) -> Result<Json<Vec<CartItem>>> {
    let Some(owner) = query.owner() else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.store().list_cart_items(&owner).await?))
}

/// `GET /carts-length?email=` - number of cart lines for an owner.
#[instrument(skip_all)]
pub async fn count_cart_items(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<OwnerQuery>,
) -> Result<Json<u64>> {
    let Some(owner) = query.owner() else {
        return Ok(Json(0));
    };
    Ok(Json(state.store().count_cart_items(&owner).await?))
}

/// `POST /carts` - add a line to the caller's cart.
#[instrument(skip_all, fields(email = %claims.email))]
pub async fn add_cart_item(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    AppJson(input): AppJson<NewCartItem>,
) -> Result<Json<InsertResult<CartItemId>>> {
    if input.email.as_ref().is_some_and(|email| email != &claims.email) {
        return Err(Rejection::NotOwner.into());
    }
    input.validate()?;

    let item = CartItem::new(claims.email, input);
    state.store().insert_cart_item(&item).await?;
    tracing::info!(cart_item_id = %item.id, food_id = %item.food_id, "Cart item added");

    Ok(Json(InsertResult::inserted(item.id)))
}

/// `DELETE /carts/{id}` - remove one of the caller's cart lines.
#[instrument(skip_all, fields(cart_item_id = %id))]
pub async fn delete_cart_item(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    AppPath(id): AppPath<CartItemId>,
) -> Result<Json<DeleteResult>> {
    let deleted_count = state.store().delete_cart_item(id, &claims.email).await?;
    tracing::info!(deleted_count, "Cart item removed");
    Ok(Json(DeleteResult { deleted_count }))
}
