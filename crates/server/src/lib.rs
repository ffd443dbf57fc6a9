//! Bistro server - HTTP backend for a restaurant ordering app.
//!
//! # Architecture
//!
//! - Axum web framework serving a JSON API to a browser SPA
//! - HS256 bearer tokens for authentication, a stored role for authorization
//! - `PostgreSQL` for users, the menu and cart lines (extra fields in JSONB)
//! - Stripe for payment intents
//!
//! The binary in `main.rs` wires configuration, logging and Sentry around
//! [`routes::app`]. Tests build the same router over [`db::MemoryStore`] and
//! a stub [`services::PaymentGateway`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use error::{AppError, Result};
pub use routes::app;
pub use state::AppState;
