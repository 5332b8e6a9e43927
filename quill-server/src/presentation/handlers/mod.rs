pub mod auth;
pub mod comment;
pub mod errors;
pub mod feed;
pub mod follow;
pub mod post;

use actix_web::HttpResponse;
use actix_web::http::header::LOCATION;

/// Plain 302, the way every success and denial redirect here works.
pub fn redirect(to: impl AsRef<str>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, to.as_ref().to_string()))
        .finish()
}

pub fn detail_path(username: &str, post_id: uuid::Uuid) -> String {
    format!("/{username}/{post_id}/")
}

pub fn profile_path(username: &str) -> String {
    format!("/{username}/")
}
