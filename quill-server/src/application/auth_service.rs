use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::{error::AppError, user::User};
use crate::infrastructure::security::{SessionKeys, hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: SessionKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: SessionKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))
    }

    /// Creates the account. Uniqueness violations come back as
    /// `AppError::Conflict` naming the offending field.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: String,
        email: String,
        password: &str,
    ) -> Result<User, AppError> {
        let hash = hash_password(password).map_err(|e| AppError::Internal(e.to_string()))?;
        let user = User::new(username, email.to_lowercase(), hash);
        self.repo.create(user).await
    }

    /// Verifies the credentials and mints a session token.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if !valid {
            return Err(AppError::NotFound(format!("user {username}")));
        }

        self.keys
            .generate_token(user.id)
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}
