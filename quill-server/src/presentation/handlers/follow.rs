use actix_web::{HttpResponse, post, web};
use tracing::info;

use crate::application::follow_service::FollowService;
use crate::domain::error::AppError;
use crate::presentation::extract::RequireUser;

use super::{profile_path, redirect};

/// Idempotent; self-follow and double-follow are quiet no-ops. Always
/// lands back on the target profile.
#[post("/{username}/follow/")]
pub async fn profile_follow(
    user: RequireUser,
    follows: web::Data<FollowService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let username = path.into_inner();
    follows.follow(user.0.id, &username).await?;
    info!(follower = %user.0.username, author = %username, "follow requested");
    Ok(redirect(profile_path(&username)))
}

/// Idempotent; unfollowing someone not followed is a quiet no-op.
#[post("/{username}/unfollow/")]
pub async fn profile_unfollow(
    user: RequireUser,
    follows: web::Data<FollowService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let username = path.into_inner();
    follows.unfollow(user.0.id, &username).await?;
    info!(follower = %user.0.username, author = %username, "unfollow requested");
    Ok(redirect(profile_path(&username)))
}
