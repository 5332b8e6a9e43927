use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Entity lookup by natural key failed. Rendered as the dedicated
    /// not-found page with the looked-up thing for display only.
    #[error("not found: {0}")]
    NotFound(String),
    /// Anonymous caller hit an auth-required route; answered with a
    /// redirect to the login page carrying the original path.
    #[error("login required")]
    LoginRequired { next: String },
    /// Unique-constraint violation surfaced to form handlers, which turn
    /// it into a field error instead of letting it escape.
    #[error("{field} already taken")]
    Conflict { field: &'static str },
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::LoginRequired { .. } => StatusCode::FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // 404 and 500 page bodies come from the response rewriters,
            // so every not-found and fault shares one shape
            AppError::NotFound(_) => HttpResponse::NotFound().finish(),
            AppError::LoginRequired { next } => {
                let query = serde_urlencoded::to_string([("next", next.as_str())])
                    .unwrap_or_default();
                HttpResponse::Found()
                    .insert_header((LOCATION, format!("/auth/login/?{query}")))
                    .finish()
            }
            AppError::Conflict { field } => HttpResponse::Conflict().json(json!({
                "error": self.to_string(),
                "field": field,
            })),
            AppError::Internal(_) => HttpResponse::InternalServerError().finish(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("serialization error: {err}"))
    }
}
