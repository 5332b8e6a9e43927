use crate::domain::error::AppError;
use crate::domain::post::{FeedEntry, FeedScope, Post};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, AppError>;
    /// Updates text, group and (when a new file was uploaded) the image.
    /// Author and publication timestamp are immutable.
    async fn update(
        &self,
        id: Uuid,
        text: String,
        group_id: Option<Uuid>,
        image: Option<String>,
    ) -> Result<Option<Post>, AppError>;
    /// Resolves a post by (author username, post id). An id that exists
    /// under a different author yields `None`.
    async fn find_scoped(&self, username: &str, id: Uuid) -> Result<Option<Post>, AppError>;
    /// One feed page, newest first.
    async fn feed(&self, scope: &FeedScope, limit: u32, offset: u64)
        -> Result<Vec<FeedEntry>, AppError>;
    async fn count(&self, scope: &FeedScope) -> Result<u64, AppError>;
}

const FEED_SELECT: &str = r#"
    SELECT p.id, p.text, p.pub_date, p.image,
           u.username AS author, g.slug AS group_slug
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN groups g ON g.id = p.group_id
"#;

const FEED_TAIL: &str = " ORDER BY p.pub_date DESC LIMIT $1 OFFSET $2";

fn feed_filter(scope: &FeedScope) -> &'static str {
    match scope {
        FeedScope::All => "",
        FeedScope::Group(_) => " WHERE p.group_id = $3",
        FeedScope::Author(_) => " WHERE p.author_id = $3",
        FeedScope::FollowedBy(_) => {
            " WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id = $3)"
        }
    }
}

fn count_filter(scope: &FeedScope) -> &'static str {
    match scope {
        FeedScope::All => "",
        FeedScope::Group(_) => " WHERE group_id = $1",
        FeedScope::Author(_) => " WHERE author_id = $1",
        FeedScope::FollowedBy(_) => {
            " WHERE author_id IN (SELECT author_id FROM follows WHERE user_id = $1)"
        }
    }
}

fn scope_param(scope: &FeedScope) -> Option<Uuid> {
    match scope {
        FeedScope::All => None,
        FeedScope::Group(id) | FeedScope::Author(id) | FeedScope::FollowedBy(id) => Some(*id),
    }
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, AppError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, text, pub_date, author_id, group_id, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id)
        .bind(&post.text)
        .bind(post.pub_date)
        .bind(post.author_id)
        .bind(post.group_id)
        .bind(&post.image)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            AppError::Internal(format!("database error: {e}"))
        })?;

        info!(post_id = %post.id, author_id = %post.author_id, "post created");
        Ok(post)
    }

    async fn update(
        &self,
        id: Uuid,
        text: String,
        group_id: Option<Uuid>,
        image: Option<String>,
    ) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET text = $1,
                group_id = $2,
                image = COALESCE($3, image)
            WHERE id = $4
            RETURNING id, text, pub_date, author_id, group_id, image
            "#,
        )
        .bind(text)
        .bind(group_id)
        .bind(image)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            AppError::Internal(format!("database error: {e}"))
        })?;

        if post.is_some() {
            info!(post_id = %id, "post updated");
        }

        Ok(post)
    }

    async fn find_scoped(&self, username: &str, id: Uuid) -> Result<Option<Post>, AppError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.text, p.pub_date, p.author_id, p.group_id, p.image
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1 AND u.username = $2
            "#,
        )
        .bind(id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find post {} for {}: {}", id, username, e);
            AppError::Internal(format!("database error: {e}"))
        })
    }

    async fn feed(
        &self,
        scope: &FeedScope,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<FeedEntry>, AppError> {
        let sql = format!("{FEED_SELECT}{}{FEED_TAIL}", feed_filter(scope));
        let mut query = sqlx::query_as::<_, FeedEntry>(&sql)
            .bind(i64::from(limit))
            .bind(offset as i64);
        if let Some(id) = scope_param(scope) {
            query = query.bind(id);
        }

        query.fetch_all(&self.pool).await.map_err(|e| {
            error!("failed to fetch feed: {}", e);
            AppError::Internal(format!("database error: {e}"))
        })
    }

    async fn count(&self, scope: &FeedScope) -> Result<u64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM posts{}", count_filter(scope));
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(id) = scope_param(scope) {
            query = query.bind(id);
        }

        let total = query.fetch_one(&self.pool).await.map_err(|e| {
            error!("failed to count posts: {}", e);
            AppError::Internal(format!("database error: {e}"))
        })?;
        Ok(total as u64)
    }
}
