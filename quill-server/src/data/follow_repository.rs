use crate::domain::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Atomic create-if-absent: a concurrent duplicate lands on the
    /// primary key and is swallowed. Returns whether a new edge was
    /// created.
    async fn follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, AppError>;
    /// Deletes the edge if present; absent is not an error. Returns
    /// whether an edge was removed.
    async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, AppError>;
    async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PostgresFollowRepository {
    pool: PgPool,
}

impl PostgresFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO follows (user_id, author_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, author_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create follow edge: {}", e);
            AppError::Internal(format!("database error: {e}"))
        })?;

        let created = result.rows_affected() > 0;
        if created {
            info!(user_id = %user_id, author_id = %author_id, "follow edge created");
        }
        Ok(created)
    }

    async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete follow edge: {}", e);
                AppError::Internal(format!("database error: {e}"))
            })?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(user_id = %user_id, author_id = %author_id, "follow edge removed");
        }
        Ok(removed)
    }

    async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to check follow edge: {}", e);
            AppError::Internal(format!("database error: {e}"))
        })
    }
}
