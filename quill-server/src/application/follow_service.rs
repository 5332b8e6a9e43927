use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::follow_repository::FollowRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::AppError;
use crate::domain::user::User;

#[derive(Clone)]
pub struct FollowService {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl FollowService {
    pub fn new(users: Arc<dyn UserRepository>, follows: Arc<dyn FollowRepository>) -> Self {
        Self { users, follows }
    }

    async fn resolve_author(&self, username: &str) -> Result<User, AppError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {username}")))
    }

    /// Idempotent: an existing edge and a self-follow are both quiet
    /// no-ops. The edge insert itself is create-if-absent, so two
    /// racing calls still end with a single edge.
    #[instrument(skip(self))]
    pub async fn follow(&self, user_id: Uuid, author_username: &str) -> Result<(), AppError> {
        let author = self.resolve_author(author_username).await?;
        if author.id == user_id {
            return Ok(());
        }
        self.follows.follow(user_id, author.id).await?;
        Ok(())
    }

    /// Idempotent: a missing edge is not an error.
    #[instrument(skip(self))]
    pub async fn unfollow(&self, user_id: Uuid, author_username: &str) -> Result<(), AppError> {
        let author = self.resolve_author(author_username).await?;
        self.follows.unfollow(user_id, author.id).await?;
        Ok(())
    }

    pub async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, AppError> {
        self.follows.is_following(user_id, author_id).await
    }
}
