//! User account routes.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use bistro_core::{Email, Role, UserId};

use crate::db::RepositoryError;
use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireAuth, guard::authorize_self};
use crate::models::{DeleteResult, InsertResult, NewUser, UpdateResult, User};
use crate::state::AppState;

use super::extract::{AppJson, AppPath};

const USER_EXISTS: &str = "user already exists";

#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub admin: bool,
}

/// `GET /users` - every user account.
#[instrument(skip_all)]
pub async fn list_users(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>> {
    Ok(Json(state.store().list_users().await?))
}

/// `POST /users` - register an account unless the email is taken.
#[instrument(skip_all, fields(email = %input.email))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewUser>,
) -> Result<Json<InsertResult<UserId>>> {
    let store = state.store();

    if store.find_user_by_email(&input.email).await?.is_some() {
        return Ok(Json(InsertResult::skipped(USER_EXISTS)));
    }

    let user = User::from_signup(input);
    match store.insert_user(&user).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id, "User created");
            Ok(Json(InsertResult::inserted(user.id)))
        }
        // Lost a race with a concurrent signup for the same email.
        Err(RepositoryError::Conflict(_)) => Ok(Json(InsertResult::skipped(USER_EXISTS))),
        Err(e) => Err(e.into()),
    }
}

/// `PATCH /users/admin/{id}` - grant the admin role.
#[instrument(skip_all, fields(user_id = %id))]
pub async fn make_admin(
    RequireAdmin(caller): RequireAdmin,
    State(state): State<AppState>,
    AppPath(id): AppPath<UserId>,
) -> Result<Json<UpdateResult>> {
    let result = state.store().set_user_role(id, Role::Admin).await?;
    tracing::info!(
        by = %caller.email,
        matched = result.matched_count,
        modified = result.modified_count,
        "Admin role granted"
    );
    Ok(Json(result))
}

/// `GET /users/admin/{email}` - whether the caller is an admin.
///
/// Callers may only ask about themselves.
#[instrument(skip_all)]
pub async fn check_admin(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    AppPath(email): AppPath<String>,
) -> Result<Json<AdminStatus>> {
    let target = Email::parse(&email).ok();
    authorize_self(&claims, target.as_ref())?;

    let admin = state
        .store()
        .find_user_by_email(&claims.email)
        .await?
        .is_some_and(|user| user.role.is_admin());

    Ok(Json(AdminStatus { admin }))
}

/// `DELETE /users/{id}` - remove an account.
#[instrument(skip_all, fields(user_id = %id))]
pub async fn delete_user(
    RequireAdmin(caller): RequireAdmin,
    State(state): State<AppState>,
    AppPath(id): AppPath<UserId>,
) -> Result<Json<DeleteResult>> {
    let deleted_count = state.store().delete_user(id).await?;
    tracing::info!(by = %caller.email, deleted_count, "User deleted");
    Ok(Json(DeleteResult { deleted_count }))
}

