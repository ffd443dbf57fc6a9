//! Checkout.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use bistro_core::to_minor_units;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::extract::AppJson;

#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    /// Total in major currency units, e.g. `19.99`.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// `POST /create-payment-intent`
#[instrument(skip_all, fields(email = %claims.email, price = %request.price))]
pub async fn create_payment_intent(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    AppJson(request): AppJson<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>> {
    let amount =
        to_minor_units(request.price).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let currency = &state.config().payment.currency;
    let intent = state
        .payments()
        .create_payment_intent(amount, currency)
        .await?;

    tracing::info!(payment_intent = %intent.id, amount, currency = %currency, "Payment intent created");

    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}
