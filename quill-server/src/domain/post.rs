use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const POST_TEXT_MAX_CHARS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    /// Set once at creation, never updated afterwards.
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

impl Post {
    pub fn new(author_id: Uuid, text: String, group_id: Option<Uuid>, image: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            pub_date: Utc::now(),
            author_id,
            group_id,
            image,
        }
    }

    /// Truncated preview used by list templates.
    pub fn short_text(&self) -> String {
        if self.text.chars().count() > 100 {
            let head: String = self.text.chars().take(97).collect();
            format!("{head}...")
        } else {
            self.text.clone()
        }
    }
}

/// One row of a feed: the post joined with its author's username and,
/// when set, the group slug. Feeds never need more than this.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedEntry {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub author: String,
    pub group_slug: Option<String>,
}

/// Filter applied to a feed query.
#[derive(Debug, Clone)]
pub enum FeedScope {
    All,
    Group(Uuid),
    Author(Uuid),
    FollowedBy(Uuid),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_short_posts_through() {
        let post = Post::new(Uuid::new_v4(), "hello".into(), None, None);
        assert_eq!(post.short_text(), "hello");
    }

    #[test]
    fn short_text_truncates_to_97_chars_plus_ellipsis() {
        let post = Post::new(Uuid::new_v4(), "x".repeat(101), None, None);
        let short = post.short_text();
        assert_eq!(short.chars().count(), 100);
        assert!(short.ends_with("..."));
    }
}
