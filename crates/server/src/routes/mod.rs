//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Readiness check (store ping)
//!
//! # Tokens
//! POST   /jwt                    - Sign a profile into an access token
//!
//! # Users
//! GET    /users                  - List users (admin)
//! POST   /users                  - Register (no-op if email exists)
//! PATCH  /users/admin/{id}       - Grant admin role (admin)
//! GET    /users/admin/{email}    - Is the caller an admin? (self only)
//! DELETE /users/{id}             - Delete user (admin)
//!
//! # Cart
//! GET    /carts?email=           - Cart lines for an owner
//! GET    /carts-length?email=    - Cart line count for an owner
//! POST   /carts                  - Add line (auth)
//! DELETE /carts/{id}             - Remove own line (auth)
//!
//! # Menu
//! GET    /menus                  - List menu
//! GET    /menus/{id}             - One menu item
//! POST   /menus                  - Create (admin)
//! PATCH  /menus/{id}             - Update (admin)
//! DELETE /menus/{id}             - Delete, cascading to cart lines (admin)
//!
//! # Checkout
//! POST   /create-payment-intent  - Create a payment intent (auth)
//! ```

pub mod auth;
pub mod carts;
pub mod extract;
pub mod health;
pub mod menus;
pub mod payments;
pub mod users;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    middleware::from_fn,
    routing::{delete, get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{cors_layer, request_id_middleware};
use crate::state::AppState;

/// Resource routes, without state or cross-cutting layers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jwt", post(auth::issue_token))
        .route("/users", get(users::list_users).post(users::create_user))
        // One path pattern serves both the id (PATCH) and the email (GET).
        .route(
            "/users/admin/{target}",
            get(users::check_admin).patch(users::make_admin),
        )
        .route("/users/{id}", delete(users::delete_user))
        .route(
            "/carts",
            get(carts::list_cart_items).post(carts::add_cart_item),
        )
        .route("/carts-length", get(carts::count_cart_items))
        .route("/carts/{id}", delete(carts::delete_cart_item))
        .route(
            "/menus",
            get(menus::list_menu_items).post(menus::create_menu_item),
        )
        .route(
            "/menus/{id}",
            get(menus::get_menu_item)
                .patch(menus::update_menu_item)
                .delete(menus::delete_menu_item),
        )
        .route(
            "/create-payment-intent",
            post(payments::create_payment_intent),
        )
}

/// The full application: health checks, resource routes and middleware.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors_allowed_origins);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors)
        .with_state(state)
}
