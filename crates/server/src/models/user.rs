//! User documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bistro_core::{Email, Role, UserId};

use super::{Attributes, strip_reserved};

const RESERVED: &[&str] = &["_id", "email", "role", "createdAt"];

/// A stored user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub email: Email,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    /// Whatever else the client sent at sign-up (name, photo URL, ...).
    #[serde(flatten)]
    pub profile: Attributes,
}

/// Sign-up payload for `POST /users`.
///
/// The role is never taken from the client; new users are customers.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: Email,
    #[serde(flatten)]
    pub profile: Attributes,
}

impl User {
    /// Build a new customer record from a sign-up payload.
    #[must_use]
    pub fn from_signup(input: NewUser) -> Self {
        Self {
            id: UserId::generate(),
            email: input.email,
            role: Role::Customer,
            created_at: Utc::now(),
            profile: strip_reserved(input.profile, RESERVED),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_signup_ignores_client_role() {
        let input: NewUser = serde_json::from_value(json!({
            "email": "Guest@Bistro.Example",
            "name": "Guest",
            "role": "admin"
        }))
        .unwrap();

        let user = User::from_signup(input);
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.email.as_str(), "guest@bistro.example");
        assert_eq!(user.profile.get("name"), Some(&json!("Guest")));
        assert!(!user.profile.contains_key("role"));
    }

    #[test]
    fn test_serialized_shape() {
        let input: NewUser =
            serde_json::from_value(json!({ "email": "a@b.c", "name": "A" })).unwrap();
        let user = User::from_signup(input);
        let value = serde_json::to_value(&user).unwrap();

        assert_eq!(value["email"], "a@b.c");
        assert_eq!(value["role"], "customer");
        assert_eq!(value["name"], "A");
        assert!(value["_id"].is_string());
        assert!(value["createdAt"].is_string());
    }
}
