use crate::domain::comment::{Comment, CommentEntry};
use crate::domain::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: Comment) -> Result<Comment, AppError>;
    /// All comments under a post, oldest first.
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<CommentEntry>, AppError>;
}

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, comment: Comment) -> Result<Comment, AppError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, text, created, active)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.text)
        .bind(comment.created)
        .bind(comment.active)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create comment: {}", e);
            AppError::Internal(format!("database error: {e}"))
        })?;

        info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");
        Ok(comment)
    }

    async fn for_post(&self, post_id: Uuid) -> Result<Vec<CommentEntry>, AppError> {
        sqlx::query_as::<_, CommentEntry>(
            r#"
            SELECT c.id, c.text, c.created, c.active, u.username AS author
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to fetch comments for post {}: {}", post_id, e);
            AppError::Internal(format!("database error: {e}"))
        })
    }
}
