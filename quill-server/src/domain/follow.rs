use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed edge: `user` follows `author`. At most one edge exists per
/// pair; the storage layer enforces this with a primary key on both
/// columns.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub user_id: Uuid,
    pub author_id: Uuid,
}
