//! Authentication extractors.
//!
//! Provides extractors for requiring a valid access token (and optionally the
//! admin role) in route handlers.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::{AppError, set_sentry_user};
use crate::services::Claims;
use crate::state::AppState;

use super::guard::{authenticate, authorize_admin};

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(claims): RequireAuth) -> String {
///     format!("Hello, {}!", claims.email)
/// }
/// ```
pub struct RequireAuth(pub Claims);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = authenticate(&parts.headers, state.tokens())?;
        set_sentry_user(claims.email.as_str());
        Ok(Self(claims))
    }
}

/// Extractor that requires a valid bearer token whose user is an admin.
///
/// Authentication runs first, so a request without a valid token is
/// rejected with 401 before the store is consulted.
pub struct RequireAdmin(pub Claims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(claims) = RequireAuth::from_request_parts(parts, state).await?;

        let user = state.store().find_user_by_email(&claims.email).await?;
        if let Err(rejection) = authorize_admin(user.as_ref()) {
            tracing::warn!(email = %claims.email, "Non-admin attempted admin route");
            return Err(rejection.into());
        }

        Ok(Self(claims))
    }
}
