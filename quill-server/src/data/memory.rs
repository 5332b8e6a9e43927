//! In-memory implementation of every repository trait. Backs the
//! integration tests so they run without a database; mirrors the
//! cascade and uniqueness rules the migrations encode in SQL.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::comment::{Comment, CommentEntry};
use crate::domain::error::AppError;
use crate::domain::group::Group;
use crate::domain::post::{FeedEntry, FeedScope, Post};
use crate::domain::user::User;

use super::comment_repository::CommentRepository;
use super::follow_repository::FollowRepository;
use super::group_repository::GroupRepository;
use super::post_repository::PostRepository;
use super::user_repository::UserRepository;

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    groups: HashMap<Uuid, Group>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    follows: HashSet<(Uuid, Uuid)>,
}

impl State {
    fn matches(&self, post: &Post, scope: &FeedScope) -> bool {
        match scope {
            FeedScope::All => true,
            FeedScope::Group(id) => post.group_id == Some(*id),
            FeedScope::Author(id) => post.author_id == *id,
            FeedScope::FollowedBy(user_id) => self.follows.contains(&(*user_id, post.author_id)),
        }
    }

    fn scoped_posts(&self, scope: &FeedScope) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| self.matches(p, scope))
            .collect();
        // pub_date descending; id as a deterministic tiebreak
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(a.id.cmp(&b.id)));
        posts
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: User) -> Result<User, AppError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict { field: "username" });
        }
        if state.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict { field: "email" });
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.users.remove(&id);
        let dead_posts: HashSet<Uuid> = state
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        state.posts.retain(|_, p| p.author_id != id);
        state
            .comments
            .retain(|_, c| c.author_id != id && !dead_posts.contains(&c.post_id));
        state.follows.retain(|(u, a)| *u != id && *a != id);
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn create(&self, group: Group) -> Result<Group, AppError> {
        let mut state = self.state.write().await;
        if state.groups.values().any(|g| g.slug == group.slug) {
            return Err(AppError::Conflict { field: "slug" });
        }
        state.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, AppError> {
        let state = self.state.read().await;
        Ok(state.groups.values().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, AppError> {
        Ok(self.state.read().await.groups.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Group>, AppError> {
        let state = self.state.read().await;
        let mut groups: Vec<Group> = state.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.groups.remove(&id);
        for post in state.posts.values_mut() {
            if post.group_id == Some(id) {
                post.group_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, post: Post) -> Result<Post, AppError> {
        let mut state = self.state.write().await;
        if post.text.chars().count() > crate::domain::post::POST_TEXT_MAX_CHARS {
            return Err(AppError::Internal("posts_text_len constraint violated".into()));
        }
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(
        &self,
        id: Uuid,
        text: String,
        group_id: Option<Uuid>,
        image: Option<String>,
    ) -> Result<Option<Post>, AppError> {
        if text.chars().count() > crate::domain::post::POST_TEXT_MAX_CHARS {
            return Err(AppError::Internal("posts_text_len constraint violated".into()));
        }
        let mut state = self.state.write().await;
        let Some(post) = state.posts.get_mut(&id) else {
            return Ok(None);
        };
        post.text = text;
        post.group_id = group_id;
        if image.is_some() {
            post.image = image;
        }
        Ok(Some(post.clone()))
    }

    async fn find_scoped(&self, username: &str, id: Uuid) -> Result<Option<Post>, AppError> {
        let state = self.state.read().await;
        let Some(post) = state.posts.get(&id) else {
            return Ok(None);
        };
        let owned = state
            .users
            .get(&post.author_id)
            .is_some_and(|u| u.username == username);
        Ok(owned.then(|| post.clone()))
    }

    async fn feed(
        &self,
        scope: &FeedScope,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<FeedEntry>, AppError> {
        let state = self.state.read().await;
        let entries = state
            .scoped_posts(scope)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|post| FeedEntry {
                id: post.id,
                text: post.text.clone(),
                pub_date: post.pub_date,
                image: post.image.clone(),
                author: state
                    .users
                    .get(&post.author_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
                group_slug: post
                    .group_id
                    .and_then(|gid| state.groups.get(&gid))
                    .map(|g| g.slug.clone()),
            })
            .collect();
        Ok(entries)
    }

    async fn count(&self, scope: &FeedScope) -> Result<u64, AppError> {
        let state = self.state.read().await;
        Ok(state.scoped_posts(scope).len() as u64)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: Comment) -> Result<Comment, AppError> {
        let mut state = self.state.write().await;
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn for_post(&self, post_id: Uuid) -> Result<Vec<CommentEntry>, AppError> {
        let state = self.state.read().await;
        let mut comments: Vec<&Comment> = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(comments
            .into_iter()
            .map(|c| CommentEntry {
                id: c.id,
                text: c.text.clone(),
                created: c.created,
                active: c.active,
                author: state
                    .users
                    .get(&c.author_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl FollowRepository for MemoryStore {
    async fn follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        Ok(state.follows.insert((user_id, author_id)))
    }

    async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        Ok(state.follows.remove(&(user_id, author_id)))
    }

    async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, AppError> {
        let state = self.state.read().await;
        Ok(state.follows.contains(&(user_id, author_id)))
    }
}
