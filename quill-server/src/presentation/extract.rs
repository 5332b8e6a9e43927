use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::domain::error::AppError;

/// The signed-in user, resolved from the session cookie by the session
/// middleware. Absent for anonymous requests.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

/// Extractor for auth-required handlers. An anonymous request is
/// answered with a redirect to the login page carrying the original
/// path as the `next` target.
pub struct RequireUser(pub CurrentUser);

impl FromRequest for RequireUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<CurrentUser>() {
            Some(user) => ready(Ok(RequireUser(user.clone()))),
            None => ready(Err(AppError::LoginRequired {
                next: original_path(req),
            })),
        }
    }
}

fn original_path(req: &HttpRequest) -> String {
    let query = req.query_string();
    if query.is_empty() {
        req.path().to_string()
    } else {
        format!("{}?{}", req.path(), query)
    }
}
