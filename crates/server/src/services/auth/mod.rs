//! Access tokens.
//!
//! `POST /jwt` signs whatever profile the client submits (it must carry an
//! `email`) into an HS256 JWT that expires after one hour. Verification only
//! checks signature and expiry; the embedded profile is not re-checked
//! against the user record.

mod error;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use bistro_core::Email;

pub use error::TokenError;

use crate::models::Attributes;

/// Lifetime of an access token.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Decoded token payload attached to authenticated requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub email: Email,
    /// Remaining profile fields as submitted at sign-in.
    #[serde(flatten)]
    pub profile: Attributes,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for a submitted profile.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidProfile` if the profile lacks a valid
    /// `email`, or `TokenError::Encode` if signing fails.
    pub fn issue(&self, mut profile: Attributes) -> Result<String, TokenError> {
        let email = match profile.remove("email") {
            Some(Value::String(raw)) => {
                Email::parse(&raw).map_err(|e| TokenError::InvalidProfile(e.to_string()))?
            }
            _ => return Err(TokenError::InvalidProfile("missing email".to_owned())),
        };
        profile.remove("iat");
        profile.remove("exp");

        let iat = Utc::now().timestamp();
        self.sign(&Claims {
            email,
            profile,
            iat,
            exp: iat + TOKEN_TTL_SECS,
        })
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for a bad signature, malformed token or
    /// expired token.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(TokenError::Encode)
    }
}
