use actix_web::cookie::Cookie;
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::{HttpResponse, Scope, get, post, web};
use serde::Deserialize;
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::domain::error::AppError;
use crate::infrastructure::security::{SESSION_COOKIE, SESSION_TTL_HOURS};
use crate::presentation::context::{LoginContext, SignupContext};
use crate::presentation::forms::{
    FieldErrors, LoginForm, SignupForm, sanitize_next, validate_signup,
};

pub fn scope() -> Scope {
    web::scope("/auth")
        .service(login_form)
        .service(login)
        .service(signup_form)
        .service(signup)
        .service(logout)
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

#[get("/login/")]
pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    let next = sanitize_next(query.next.as_deref());
    HttpResponse::Ok().json(LoginContext::new(String::new(), next, FieldErrors::default()))
}

#[post("/login/")]
pub async fn login(
    auth: web::Data<AuthService>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    let next = sanitize_next(form.next.as_deref());
    match auth.login(&form.username, &form.password).await {
        Ok(token) => {
            info!(username = %form.username, "user logged in");
            Ok(HttpResponse::Found()
                .insert_header(("Location", next.clone()))
                .cookie(session_cookie(token))
                .finish())
        }
        Err(AppError::NotFound(_)) => {
            let mut errors = FieldErrors::default();
            errors.add("__all__", "invalid username or password");
            let form = form.into_inner();
            Ok(HttpResponse::Ok().json(LoginContext::new(form.username, next, errors)))
        }
        Err(e) => Err(e),
    }
}

#[get("/signup/")]
pub async fn signup_form() -> HttpResponse {
    HttpResponse::Ok().json(SignupContext::new(
        String::new(),
        String::new(),
        FieldErrors::default(),
    ))
}

/// Creates the account and signs the new user straight in.
#[post("/signup/")]
pub async fn signup(
    auth: web::Data<AuthService>,
    form: web::Form<SignupForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let errors = validate_signup(&form);
    if !errors.is_empty() {
        return Ok(HttpResponse::Ok().json(SignupContext::new(form.username, form.email, errors)));
    }

    match auth
        .register(form.username.clone(), form.email.clone(), &form.password)
        .await
    {
        Ok(user) => {
            let token = auth
                .keys()
                .generate_token(user.id)
                .map_err(|e| AppError::Internal(e.to_string()))?;
            info!(username = %user.username, "user signed up");
            Ok(HttpResponse::Found()
                .insert_header(("Location", "/"))
                .cookie(session_cookie(token))
                .finish())
        }
        Err(AppError::Conflict { field }) => {
            let mut errors = FieldErrors::default();
            errors.add(field, "already taken");
            Ok(HttpResponse::Ok().json(SignupContext::new(form.username, form.email, errors)))
        }
        Err(e) => Err(e),
    }
}

#[post("/logout/")]
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    HttpResponse::Found()
        .insert_header(("Location", "/"))
        .cookie(cookie)
        .finish()
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::hours(SESSION_TTL_HOURS))
        .finish()
}
