use crate::domain::error::AppError;
use crate::domain::group::Group;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn create(&self, group: Group) -> Result<Group, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, AppError>;
    /// All groups ordered by title, for the post form's group choices.
    async fn list(&self) -> Result<Vec<Group>, AppError>;
    /// Removes the group; its posts survive with a cleared group
    /// reference.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PostgresGroupRepository {
    pool: PgPool,
}

impl PostgresGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn create(&self, group: Group) -> Result<Group, AppError> {
        sqlx::query(
            r#"
            INSERT INTO groups (id, title, slug, description)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(group.id)
        .bind(&group.title)
        .bind(&group.slug)
        .bind(&group.description)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .and_then(|db| db.constraint())
                .map(|c| c.contains("groups_slug"))
                == Some(true)
            {
                AppError::Conflict { field: "slug" }
            } else {
                error!("failed to create group: {}", e);
                AppError::Internal(format!("database error: {e}"))
            }
        })?;

        info!(group_id = %group.id, slug = %group.slug, "group created");
        Ok(group)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, AppError> {
        sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find group by slug {}: {}", slug, e);
            AppError::Internal(format!("database error: {e}"))
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, AppError> {
        sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find group by id {}: {}", id, e);
            AppError::Internal(format!("database error: {e}"))
        })
    }

    async fn list(&self) -> Result<Vec<Group>, AppError> {
        sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to list groups: {}", e);
            AppError::Internal(format!("database error: {e}"))
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete group {}: {}", id, e);
                AppError::Internal(format!("database error: {e}"))
            })?;

        info!(group_id = %id, "group deleted");
        Ok(())
    }
}
