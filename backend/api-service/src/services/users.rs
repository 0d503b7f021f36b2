use crate::db::Stores;
use crate::error::{AppError, Result};
use crate::models::{user::normalize_email, User};
use uuid::Uuid;

/// Account registration and lookup. Credentials and token issuance are owned
/// by the identity issuer; this service only creates the profile record.
#[derive(Clone)]
pub struct UserService {
    stores: Stores,
}

impl UserService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Create an account for a validated registration.
    pub async fn register(&self, name: &str, email: &str) -> Result<User> {
        let email = normalize_email(email);

        if self
            .stores
            .users
            .find_user_by_email(&email)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest("User already exists".to_string()));
        }

        let user = User::new(name, &email);
        self.stores.users.insert_user(&user).await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        self.stores
            .users
            .find_user(id)
            .await?
            .ok_or_else(AppError::user_not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_normalizes_and_rejects_duplicates() {
        let service = UserService::new(Stores::in_memory());

        let user = service.register("Jane", " Jane@Example.com").await.unwrap();
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(service.get_user(user.id).await.unwrap(), user);

        let err = service
            .register("Jane Again", "JANE@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "User already exists"));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let service = UserService::new(Stores::in_memory());
        let err = service.get_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "User not found"));
    }
}
