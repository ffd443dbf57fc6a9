//! Token issuance.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::models::Attributes;
use crate::state::AppState;

use super::extract::AppJson;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `POST /jwt` - sign the submitted profile into an access token.
///
/// The profile is not checked against the user store; any caller that can
/// name an email receives a token for it.
#[instrument(skip_all)]
pub async fn issue_token(
    State(state): State<AppState>,
    AppJson(profile): AppJson<Attributes>,
) -> Result<Json<TokenResponse>> {
    let token = state.tokens().issue(profile)?;
    tracing::debug!("Issued access token");
    Ok(Json(TokenResponse { token }))
}
