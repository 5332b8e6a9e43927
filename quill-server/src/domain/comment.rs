use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
    /// Moderation flag. Display is not gated on it.
    pub active: bool,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            text,
            created: Utc::now(),
            active: false,
        }
    }
}

/// A comment joined with its author's username, ordered oldest first
/// under a post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentEntry {
    pub id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
    pub active: bool,
    pub author: String,
}
