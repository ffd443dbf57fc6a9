//! User management commands.
//!
//! The HTTP API can only grant the admin role from an existing admin, so the
//! first one has to be promoted here.

use bistro_core::{Email, Role};
use bistro_server::db::{self, UserRepository};
use tracing::info;

use super::database_url;

/// Grant the admin role to the user with `email`.
///
/// # Errors
///
/// Returns an error if the email is invalid, no such user exists, or a
/// database operation fails.
pub async fn promote(email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)?;

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;

    let found = UserRepository::new(&pool)
        .set_role_by_email(&email, Role::Admin)
        .await?;

    if !found {
        return Err(format!("No user with email {email}").into());
    }

    info!(email = %email, "User promoted to admin");
    Ok(())
}
