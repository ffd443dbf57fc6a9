//! Services wrapping external collaborators.
//!
//! - `auth` - Access token issuance and verification (HS256 JWT)
//! - `payments` - Payment gateway abstraction and the Stripe client

pub mod auth;
pub mod payments;

pub use auth::{Claims, TokenError, TokenService};
pub use payments::{PaymentError, PaymentGateway, PaymentIntent, StripeClient};
