//! Access token error types.

use thiserror::Error;

/// Errors that can occur issuing or verifying access tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The submitted profile has no usable `email` field.
    #[error("profile must include a valid email: {0}")]
    InvalidProfile(String),

    /// Signing failed.
    #[error("token encoding failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// Signature, structure or expiry check failed.
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    /// Whether the token was rejected only because it expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(
            self,
            Self::Invalid(e) if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature)
        )
    }
}
