//! Request and response types for the auth endpoints. The user record's exact
//! shape belongs to the backend contract; fields the client does not know
//! about are kept so the persisted copy round-trips unchanged. Requests carry
//! passwords, so they must never be logged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(u64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(id) => write!(formatter, "{id}"),
            UserId::Text(id) => write!(formatter, "{id}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    #[must_use]
    pub fn new(id: UserId, name: &str, email: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            extra: Map::new(),
        }
    }
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirmation: &'a str,
}

/// Body returned by the login and register endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_keeps_unknown_fields() {
        let payload = json!({
            "id": 7,
            "name": "Alen Jake",
            "email": "alen@mail.com",
            "email_verified_at": null,
            "roles": ["admin"]
        });

        let user: User = serde_json::from_value(payload.clone()).expect("Failed to deserialize");
        assert_eq!(user.id, UserId::Number(7));
        assert_eq!(user.extra.get("roles"), Some(&json!(["admin"])));

        let back = serde_json::to_value(&user).expect("Failed to serialize");
        assert_eq!(back, payload);
    }

    #[test]
    fn user_id_accepts_strings() {
        let user: User = serde_json::from_value(json!({
            "id": "01J8Z6",
            "name": "A",
            "email": "a@b.com"
        }))
        .expect("Failed to deserialize");

        assert_eq!(user.id.to_string(), "01J8Z6");
    }

    #[test]
    fn register_request_uses_backend_field_names() {
        let request = RegisterRequest {
            name: "Alen Jake",
            email: "alen@mail.com",
            password: "longenough1",
            password_confirmation: "longenough1",
        };

        assert_eq!(
            serde_json::to_value(&request).expect("Failed to serialize"),
            json!({
                "name": "Alen Jake",
                "email": "alen@mail.com",
                "password": "longenough1",
                "password_confirmation": "longenough1"
            })
        );
    }

    #[test]
    fn auth_response_without_user() {
        let response: AuthResponse =
            serde_json::from_value(json!({ "message": "ok" })).expect("Failed to deserialize");
        assert!(response.user.is_none());
    }
}
