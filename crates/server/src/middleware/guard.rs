//! Pure authentication and authorization checks.
//!
//! The extractors in [`super::auth`] gather inputs (headers, a user record)
//! and delegate the decision to these functions.

use axum::{
    Json,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use bistro_core::Email;

use crate::models::User;
use crate::services::{Claims, TokenService};

/// Reason a guard refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// No `Authorization` header.
    #[error("missing access token")]
    MissingToken,
    /// Header present but not `Bearer <token>`.
    #[error("malformed authorization header")]
    MalformedHeader,
    /// Bad signature, malformed or unreadable token.
    #[error("invalid access token")]
    InvalidToken,
    #[error("access token expired")]
    ExpiredToken,
    /// Caller is authenticated but not an admin.
    #[error("admin role required")]
    NotAdmin,
    /// Caller is acting on another user's data.
    #[error("forbidden access")]
    NotOwner,
}

impl Rejection {
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::MissingToken | Self::MalformedHeader | Self::InvalidToken | Self::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotAdmin | Self::NotOwner => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Extract the bearer token from request headers.
///
/// # Errors
///
/// `MissingToken` without an `Authorization` header, `MalformedHeader` when
/// it is not `Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, Rejection> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(Rejection::MissingToken)?
        .to_str()
        .map_err(|_| Rejection::MalformedHeader)?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(Rejection::MalformedHeader)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(Rejection::MalformedHeader);
    }
    Ok(token)
}

/// Verify the request's bearer token.
///
/// # Errors
///
/// Any header or token problem, as a 401 rejection.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<Claims, Rejection> {
    let token = bearer_token(headers)?;
    tokens.verify(token).map_err(|err| {
        if err.is_expired() {
            Rejection::ExpiredToken
        } else {
            tracing::debug!(error = %err, "Rejected access token");
            Rejection::InvalidToken
        }
    })
}

/// Allow only a stored user whose role is admin.
///
/// # Errors
///
/// `NotAdmin` when the user is missing or not an admin.
pub fn authorize_admin(user: Option<&User>) -> Result<(), Rejection> {
    match user {
        Some(user) if user.role.is_admin() => Ok(()),
        _ => Err(Rejection::NotAdmin),
    }
}

/// Allow the caller to act only on their own email.
///
/// # Errors
///
/// `NotOwner` when `target` is absent or differs from the token's email.
pub fn authorize_self(claims: &Claims, target: Option<&Email>) -> Result<(), Rejection> {
    match target {
        Some(email) if email == &claims.email => Ok(()),
        _ => Err(Rejection::NotOwner),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{body::to_bytes, http::HeaderValue};
    use bistro_core::Role;
    use secrecy::SecretString;
    use serde_json::Value;

    use super::*;
    use crate::models::{Attributes, NewUser};

    const SECRET: &str = "q8Z!r2Lp#5Wm@9Tx$3Vb^7Nc&1Hd*4Kf";

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn tokens() -> TokenService {
        TokenService::new(&SecretString::from(SECRET.to_owned()))
    }

    fn issue(tokens: &TokenService, email: &str) -> String {
        let Value::Object(profile) = json!({ "email": email }) else {
            unreachable!()
        };
        tokens.issue(profile).unwrap()
    }

    fn user(email: &str, role: Role) -> User {
        let mut user =
            User::from_signup(serde_json::from_value::<NewUser>(json!({ "email": email })).unwrap());
        user.role = role;
        user
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), "abc");
        assert_eq!(
            bearer_token(&HeaderMap::new()).unwrap_err(),
            Rejection::MissingToken
        );
        assert_eq!(
            bearer_token(&headers("abc.def")).unwrap_err(),
            Rejection::MalformedHeader
        );
        assert_eq!(
            bearer_token(&headers("Basic abc")).unwrap_err(),
            Rejection::MalformedHeader
        );
        assert_eq!(
            bearer_token(&headers("Bearer ")).unwrap_err(),
            Rejection::MalformedHeader
        );
    }

    #[test]
    fn test_authenticate() {
        let tokens = tokens();
        let token = issue(&tokens, "guest@bistro.example");

        let claims = authenticate(&headers(&format!("Bearer {token}")), &tokens).unwrap();
        assert_eq!(claims.email.as_str(), "guest@bistro.example");

        assert_eq!(
            authenticate(&headers("Bearer nope"), &tokens).unwrap_err(),
            Rejection::InvalidToken
        );
    }

    #[test]
    fn test_authorize_admin() {
        assert!(authorize_admin(Some(&user("a@x.io", Role::Admin))).is_ok());
        assert_eq!(
            authorize_admin(Some(&user("a@x.io", Role::Customer))).unwrap_err(),
            Rejection::NotAdmin
        );
        assert_eq!(authorize_admin(None).unwrap_err(), Rejection::NotAdmin);
    }

    #[test]
    fn test_authorize_self() {
        let claims = Claims {
            email: Email::parse("a@x.io").unwrap(),
            profile: Attributes::new(),
            iat: 0,
            exp: 0,
        };
        let me = Email::parse("A@X.io").unwrap();
        let other = Email::parse("b@x.io").unwrap();

        assert!(authorize_self(&claims, Some(&me)).is_ok());
        assert_eq!(
            authorize_self(&claims, Some(&other)).unwrap_err(),
            Rejection::NotOwner
        );
        assert_eq!(authorize_self(&claims, None).unwrap_err(), Rejection::NotOwner);
    }

    #[test]
    fn test_rejection_status() {
        assert_eq!(Rejection::ExpiredToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Rejection::NotOwner.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rejection_body_matches_display() {
        for (rejection, message) in [
            (Rejection::MissingToken, "missing access token"),
            (Rejection::InvalidToken, "invalid access token"),
            (Rejection::NotAdmin, "admin role required"),
            (Rejection::NotOwner, "forbidden access"),
        ] {
            let response = rejection.into_response();
            assert_eq!(response.status(), rejection.status());

            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body, json!({ "error": message }));
            assert_eq!(rejection.to_string(), message);
        }
    }
}
