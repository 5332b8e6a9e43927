use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, get, post, web};
use tracing::info;
use uuid::Uuid;

use crate::application::post_service::PostService;
use crate::domain::error::AppError;
use crate::infrastructure::media::{MediaError, MediaStore};
use crate::presentation::context::{PostDetailContext, PostFormContext};
use crate::presentation::extract::RequireUser;
use crate::presentation::forms::{FieldErrors, PostFormValues, PostUpload, validate_post_form};

use super::{detail_path, redirect};

#[get("/new/")]
pub async fn new_post_form(
    _user: RequireUser,
    posts: web::Data<PostService>,
) -> Result<HttpResponse, AppError> {
    let groups = posts.group_choices().await?;
    let context = PostFormContext::new(
        None,
        PostFormValues::default(),
        FieldErrors::default(),
        groups,
    );
    Ok(HttpResponse::Ok().json(context))
}

/// Creates a post owned by the session user. A client-supplied author
/// is never read. Failure redisplays the form; nothing is persisted.
#[post("/new/")]
pub async fn create_post(
    user: RequireUser,
    posts: web::Data<PostService>,
    media: web::Data<MediaStore>,
    form: MultipartForm<PostUpload>,
) -> Result<HttpResponse, AppError> {
    match process_form(&posts, &media, form.into_inner()).await? {
        Ok(processed) => {
            let post = posts
                .create(
                    user.0.id,
                    processed.values.text,
                    processed.values.group,
                    processed.image,
                )
                .await?;
            info!(post_id = %post.id, username = %user.0.username, "post created");
            Ok(redirect("/"))
        }
        Err((values, errors)) => {
            let groups = posts.group_choices().await?;
            let context = PostFormContext::new(None, values, errors, groups);
            Ok(HttpResponse::Ok().json(context))
        }
    }
}

#[get("/{username}/{post_id}/")]
pub async fn post_detail(
    posts: web::Data<PostService>,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (username, post_id) = path.into_inner();
    let detail = posts.detail(&username, post_id).await?;
    Ok(HttpResponse::Ok().json(PostDetailContext::empty_form(detail)))
}

#[get("/{username}/{post_id}/edit/")]
pub async fn edit_post_form(
    user: RequireUser,
    posts: web::Data<PostService>,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (username, post_id) = path.into_inner();
    let post = posts.resolve(&username, post_id).await?;
    if post.author_id != user.0.id {
        // not the author: back to the detail page, never an error
        return Ok(redirect(detail_path(&username, post_id)));
    }

    let groups = posts.group_choices().await?;
    let values = PostFormValues {
        text: post.text,
        group: post.group_id,
    };
    let context = PostFormContext::new(Some(post.id), values, FieldErrors::default(), groups);
    Ok(HttpResponse::Ok().json(context))
}

/// Edits text, group and image in place; author and publication
/// timestamp are immutable. Non-authors get the same silent redirect
/// as the edit form.
#[post("/{username}/{post_id}/edit/")]
pub async fn edit_post(
    user: RequireUser,
    posts: web::Data<PostService>,
    media: web::Data<MediaStore>,
    path: web::Path<(String, Uuid)>,
    form: MultipartForm<PostUpload>,
) -> Result<HttpResponse, AppError> {
    let (username, post_id) = path.into_inner();
    let post = posts.resolve(&username, post_id).await?;
    if post.author_id != user.0.id {
        return Ok(redirect(detail_path(&username, post_id)));
    }

    match process_form(&posts, &media, form.into_inner()).await? {
        Ok(processed) => {
            posts
                .update(
                    post.id,
                    processed.values.text,
                    processed.values.group,
                    processed.image,
                )
                .await?;
            info!(post_id = %post.id, username = %user.0.username, "post updated");
            Ok(redirect(detail_path(&username, post_id)))
        }
        Err((values, errors)) => {
            let groups = posts.group_choices().await?;
            let context = PostFormContext::new(Some(post.id), values, errors, groups);
            Ok(HttpResponse::Ok().json(context))
        }
    }
}

struct ProcessedPost {
    values: PostFormValues,
    image: Option<String>,
}

/// Shared create/edit path: field validation, group existence, image
/// persistence. The outer `Result` is a fault; the inner one is
/// valid-vs-redisplay. Nothing touches disk until every field has
/// passed.
async fn process_form(
    posts: &PostService,
    media: &MediaStore,
    form: PostUpload,
) -> Result<Result<ProcessedPost, (PostFormValues, FieldErrors)>, AppError> {
    let (values, mut errors) = validate_post_form(
        form.text.as_ref().map(|t| t.0.as_str()),
        form.group.as_ref().map(|t| t.0.as_str()),
    );

    if let Some(group_id) = values.group {
        if posts.find_group(group_id).await?.is_none() {
            errors.add("group", "select a valid group");
        }
    }

    let upload = form.image.as_ref().filter(|f| f.size > 0);
    if let Some(upload) = upload {
        if let Err(MediaError::Invalid(message)) = media.validate_image(upload) {
            errors.add("image", message);
        }
    }

    if !errors.is_empty() {
        return Ok(Err((values, errors)));
    }

    let mut image = None;
    if let Some(upload) = upload {
        let path = media
            .save_image(upload)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        image = Some(path);
    }

    Ok(Ok(ProcessedPost { values, image }))
}
