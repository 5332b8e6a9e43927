//! Typed page contexts. The presentation layer is a pure renderer:
//! every handler answers with one of these serialized as JSON, and the
//! `template` field names the template a renderer would feed it to.

use serde::Serialize;
use uuid::Uuid;

use crate::application::post_service::PostDetail;
use crate::domain::comment::CommentEntry;
use crate::domain::group::Group;
use crate::domain::page::Page;
use crate::domain::post::FeedEntry;

use super::forms::{FieldErrors, PostFormValues};

/// Public slice of a user shown on profile and detail pages.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct IndexContext {
    pub template: &'static str,
    pub page: Page<FeedEntry>,
}

impl IndexContext {
    pub fn new(page: Page<FeedEntry>) -> Self {
        Self {
            template: "index.html",
            page,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupContext {
    pub template: &'static str,
    pub group: Group,
    pub page: Page<FeedEntry>,
}

impl GroupContext {
    pub fn new(group: Group, page: Page<FeedEntry>) -> Self {
        Self {
            template: "group.html",
            group,
            page,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileContext {
    pub template: &'static str,
    pub author: AuthorView,
    pub page: Page<FeedEntry>,
    pub post_count: u64,
    /// Whether the signed-in caller follows this author; `false` for
    /// anonymous callers.
    pub following: bool,
}

#[derive(Debug, Serialize)]
pub struct FollowFeedContext {
    pub template: &'static str,
    pub page: Page<FeedEntry>,
}

impl FollowFeedContext {
    pub fn new(page: Page<FeedEntry>) -> Self {
        Self {
            template: "follow.html",
            page,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentFormContext {
    pub text: String,
    pub errors: FieldErrors,
}

#[derive(Debug, Serialize)]
pub struct PostDetailContext {
    pub template: &'static str,
    pub post: FeedEntry,
    pub author: AuthorView,
    pub post_count: u64,
    pub comments: Vec<CommentEntry>,
    pub form: CommentFormContext,
}

impl PostDetailContext {
    pub fn new(detail: PostDetail, form: CommentFormContext) -> Self {
        let PostDetail {
            post,
            author,
            group,
            comments,
            post_count,
        } = detail;
        Self {
            template: "post.html",
            post: FeedEntry {
                id: post.id,
                text: post.text,
                pub_date: post.pub_date,
                image: post.image,
                author: author.username.clone(),
                group_slug: group.map(|g| g.slug),
            },
            author: AuthorView {
                username: author.username,
            },
            post_count,
            comments,
            form,
        }
    }

    pub fn empty_form(detail: PostDetail) -> Self {
        Self::new(
            detail,
            CommentFormContext {
                text: String::new(),
                errors: FieldErrors::default(),
            },
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupChoice {
    pub id: Uuid,
    pub title: String,
}

impl From<Group> for GroupChoice {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            title: group.title,
        }
    }
}

/// Create and edit share the post form template; `post` is set when
/// editing.
#[derive(Debug, Serialize)]
pub struct PostFormContext {
    pub template: &'static str,
    pub post: Option<Uuid>,
    pub values: PostFormValues,
    pub errors: FieldErrors,
    pub groups: Vec<GroupChoice>,
}

impl PostFormContext {
    pub fn new(
        post: Option<Uuid>,
        values: PostFormValues,
        errors: FieldErrors,
        groups: Vec<Group>,
    ) -> Self {
        Self {
            template: "new.html",
            post,
            values,
            errors,
            groups: groups.into_iter().map(GroupChoice::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginContext {
    pub template: &'static str,
    pub username: String,
    pub next: String,
    pub errors: FieldErrors,
}

impl LoginContext {
    pub fn new(username: String, next: String, errors: FieldErrors) -> Self {
        Self {
            template: "login.html",
            username,
            next,
            errors,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupContext {
    pub template: &'static str,
    pub username: String,
    pub email: String,
    pub errors: FieldErrors,
}

impl SignupContext {
    pub fn new(username: String, email: String, errors: FieldErrors) -> Self {
        Self {
            template: "signup.html",
            username,
            email,
            errors,
        }
    }
}
