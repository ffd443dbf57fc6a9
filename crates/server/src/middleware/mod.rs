//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. CORS
//! 3. `TraceLayer` (request span with `request_id` field)
//! 4. Request ID (fills the span field, echoes `x-request-id`)
//!
//! Authentication is not a layer: handlers opt in through the
//! [`RequireAuth`] and [`RequireAdmin`] extractors.

pub mod auth;
pub mod cors;
pub mod guard;
pub mod request_id;

pub use auth::{RequireAdmin, RequireAuth};
pub use cors::cors_layer;
pub use guard::Rejection;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
