use actix_web::{HttpResponse, post, web};
use tracing::info;
use uuid::Uuid;

use crate::application::post_service::PostService;
use crate::domain::error::AppError;
use crate::presentation::context::{CommentFormContext, PostDetailContext};
use crate::presentation::extract::RequireUser;
use crate::presentation::forms::{CommentForm, validate_comment};

use super::{detail_path, redirect};

/// Adds a comment under the resolved post, authored by the session
/// user; hidden-field tampering cannot rebind either. Invalid text
/// redisplays the detail page with the bound form errors rather than
/// dropping the submission silently.
#[post("/{username}/{post_id}/comment")]
pub async fn add_comment(
    user: RequireUser,
    posts: web::Data<PostService>,
    path: web::Path<(String, Uuid)>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse, AppError> {
    let (username, post_id) = path.into_inner();
    let post = posts.resolve(&username, post_id).await?;

    let errors = validate_comment(&form.text);
    if !errors.is_empty() {
        let detail = posts.detail(&username, post_id).await?;
        let context = PostDetailContext::new(
            detail,
            CommentFormContext {
                text: form.into_inner().text,
                errors,
            },
        );
        return Ok(HttpResponse::Ok().json(context));
    }

    let comment = posts
        .add_comment(post.id, user.0.id, form.into_inner().text)
        .await?;
    info!(comment_id = %comment.id, post_id = %post.id, username = %user.0.username, "comment added");
    Ok(redirect(detail_path(&username, post_id)))
}
