use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;

/// Account record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Credential hash provisioned by the identity issuer. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

impl User {
    /// Build a fresh account. The email is normalized to lowercase and the
    /// avatar derived from it.
    pub fn new(name: &str, email: &str) -> Self {
        let email = normalize_email(email);
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            avatar: gravatar_url(&email),
            email,
            password_hash: None,
            date: Utc::now(),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Gravatar URL for an address: 200px, PG rated, "mystery person" fallback.
pub fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(normalize_email(email).as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
        hex::encode(digest)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravatar_is_case_and_space_insensitive() {
        assert_eq!(
            gravatar_url("  Jane@Example.com "),
            gravatar_url("jane@example.com")
        );
        assert!(gravatar_url("jane@example.com").starts_with("https://www.gravatar.com/avatar/"));
    }

    #[test]
    fn test_new_user_normalizes_fields() {
        let user = User::new(" Jane ", "JANE@example.com");
        assert_eq!(user.name, "Jane");
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.avatar, gravatar_url("jane@example.com"));
        assert!(user.password_hash.is_none());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let mut user = User::new("Jane", "jane@example.com");
        user.password_hash = Some("$argon2id$secret".to_string());

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "jane@example.com");
    }
}
