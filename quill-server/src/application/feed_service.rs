use std::sync::Arc;

use uuid::Uuid;

use crate::data::group_repository::GroupRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::AppError;
use crate::domain::group::Group;
use crate::domain::page::{self, Page};
use crate::domain::post::{FeedEntry, FeedScope};
use crate::domain::user::User;

/// Builds the four paginated feeds. Page resolution follows one rule
/// everywhere: malformed page values mean page 1, past-the-end values
/// clamp to the last page.
#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
    page_size: u32,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
        page_size: u32,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
            page_size,
        }
    }

    async fn page(&self, scope: FeedScope, raw_page: Option<&str>) -> Result<Page<FeedEntry>, AppError> {
        let total = self.posts.count(&scope).await?;
        let number = page::resolve_page(raw_page, total, self.page_size);
        let items = self
            .posts
            .feed(&scope, self.page_size, page::offset(number, self.page_size))
            .await?;
        Ok(Page::new(items, number, self.page_size, total))
    }

    /// All posts, newest first.
    pub async fn index(&self, raw_page: Option<&str>) -> Result<Page<FeedEntry>, AppError> {
        self.page(FeedScope::All, raw_page).await
    }

    /// Posts in the group resolved by slug; unknown slug is not-found.
    pub async fn group(
        &self,
        slug: &str,
        raw_page: Option<&str>,
    ) -> Result<(Group, Page<FeedEntry>), AppError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group {slug}")))?;
        let page = self.page(FeedScope::Group(group.id), raw_page).await?;
        Ok((group, page))
    }

    /// A user's posts plus their total post count.
    pub async fn profile(
        &self,
        username: &str,
        raw_page: Option<&str>,
    ) -> Result<(User, Page<FeedEntry>, u64), AppError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;
        let page = self.page(FeedScope::Author(author.id), raw_page).await?;
        let post_count = page.total_items;
        Ok((author, page, post_count))
    }

    /// Posts authored by anyone the caller follows.
    pub async fn following(
        &self,
        user_id: Uuid,
        raw_page: Option<&str>,
    ) -> Result<Page<FeedEntry>, AppError> {
        self.page(FeedScope::FollowedBy(user_id), raw_page).await
    }
}
