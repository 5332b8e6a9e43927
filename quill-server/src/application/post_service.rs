use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::group_repository::GroupRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::comment::{Comment, CommentEntry};
use crate::domain::error::AppError;
use crate::domain::group::Group;
use crate::domain::post::{FeedScope, Post};
use crate::domain::user::User;

/// Everything the post detail page shows.
pub struct PostDetail {
    pub post: Post,
    pub author: User,
    pub group: Option<Group>,
    pub comments: Vec<CommentEntry>,
    pub post_count: u64,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            comments,
            groups,
            users,
        }
    }

    /// Resolves a post by (username, post id). An id that exists under
    /// a different author is not-found, never a hint that the post
    /// exists elsewhere.
    pub async fn resolve(&self, username: &str, post_id: Uuid) -> Result<Post, AppError> {
        self.posts
            .find_scoped(username, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id} by {username}")))
    }

    pub async fn detail(&self, username: &str, post_id: Uuid) -> Result<PostDetail, AppError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;
        let post = self.resolve(username, post_id).await?;
        let group = match post.group_id {
            Some(id) => self.groups.find_by_id(id).await?,
            None => None,
        };
        let comments = self.comments.for_post(post.id).await?;
        let post_count = self.posts.count(&FeedScope::Author(author.id)).await?;
        Ok(PostDetail {
            post,
            author,
            group,
            comments,
            post_count,
        })
    }

    #[instrument(skip(self, text))]
    pub async fn create(
        &self,
        author_id: Uuid,
        text: String,
        group_id: Option<Uuid>,
        image: Option<String>,
    ) -> Result<Post, AppError> {
        self.posts
            .create(Post::new(author_id, text, group_id, image))
            .await
    }

    /// In-place edit; author and publication timestamp never change.
    #[instrument(skip(self, text))]
    pub async fn update(
        &self,
        post_id: Uuid,
        text: String,
        group_id: Option<Uuid>,
        image: Option<String>,
    ) -> Result<Post, AppError> {
        self.posts
            .update(post_id, text, group_id, image)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))
    }

    /// Binds the comment to the already-resolved post and the session
    /// user; client-supplied bindings are never trusted.
    #[instrument(skip(self, text))]
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> Result<Comment, AppError> {
        self.comments
            .create(Comment::new(post_id, author_id, text))
            .await
    }

    /// Group choices for the post form.
    pub async fn group_choices(&self) -> Result<Vec<Group>, AppError> {
        self.groups.list().await
    }

    pub async fn find_group(&self, id: Uuid) -> Result<Option<Group>, AppError> {
        self.groups.find_by_id(id).await
    }
}
