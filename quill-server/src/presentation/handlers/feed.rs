use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, get, web};
use serde::Deserialize;
use tracing::debug;

use crate::application::feed_service::FeedService;
use crate::application::follow_service::FollowService;
use crate::domain::error::AppError;
use crate::infrastructure::cache::PageCache;
use crate::presentation::context::{
    AuthorView, FollowFeedContext, GroupContext, IndexContext, ProfileContext,
};
use crate::presentation::extract::{CurrentUser, RequireUser};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Public index feed. The serialized body is cached per path+query for
/// the configured TTL, so two requests inside the window are
/// byte-identical regardless of intervening writes.
#[get("/")]
pub async fn index(
    req: HttpRequest,
    feeds: web::Data<FeedService>,
    cache: web::Data<PageCache>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let key = cache_key(&req);
    if let Some(body) = cache.get(&key) {
        debug!(key = %key, "index served from cache");
        return Ok(HttpResponse::Ok()
            .content_type(ContentType::json())
            .body(body));
    }

    let page = feeds.index(query.page.as_deref()).await?;
    let body = serde_json::to_vec(&IndexContext::new(page))?;
    cache.set(key, body.clone());

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body))
}

#[get("/group/{slug}/")]
pub async fn group_feed(
    feeds: web::Data<FeedService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let slug = path.into_inner();
    let (group, page) = feeds.group(&slug, query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(GroupContext::new(group, page)))
}

/// Posts by authors the caller follows. Login required, never cached.
#[get("/follow/")]
pub async fn follow_feed(
    user: RequireUser,
    feeds: web::Data<FeedService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = feeds.following(user.0.id, query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(FollowFeedContext::new(page)))
}

#[get("/{username}/")]
pub async fn profile(
    feeds: web::Data<FeedService>,
    follows: web::Data<FollowService>,
    viewer: Option<RequireUser>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let username = path.into_inner();
    let (author, page, post_count) = feeds.profile(&username, query.page.as_deref()).await?;
    let following = match viewer.as_ref().map(|u| &u.0) {
        Some(CurrentUser { id, .. }) => follows.is_following(*id, author.id).await?,
        None => false,
    };
    Ok(HttpResponse::Ok().json(ProfileContext {
        template: "profile.html",
        author: AuthorView {
            username: author.username,
        },
        page,
        post_count,
        following,
    }))
}

fn cache_key(req: &HttpRequest) -> String {
    let query = req.query_string();
    if query.is_empty() {
        req.path().to_string()
    } else {
        format!("{}?{}", req.path(), query)
    }
}
