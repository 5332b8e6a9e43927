#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use quill_server::AppState;
use quill_server::Repositories;
use quill_server::data::memory::MemoryStore;
use quill_server::data::group_repository::GroupRepository;
use quill_server::data::post_repository::PostRepository;
use quill_server::data::user_repository::UserRepository;
use quill_server::domain::group::Group;
use quill_server::domain::post::Post;
use quill_server::domain::user::User;
use quill_server::infrastructure::config::AppConfig;

pub const BOUNDARY: &str = "----quill-test-boundary";

pub fn config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        database_url: String::new(),
        session_secret: "test-secret".into(),
        page_size: 10,
        index_cache_ttl_secs: 20,
        media_root: std::env::temp_dir()
            .join(format!("quill-test-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
        max_image_bytes: 1024 * 1024,
    }
}

/// Fresh in-memory application plus a handle on the backing store for
/// seeding and assertions.
pub fn state() -> (MemoryStore, AppState) {
    let store = MemoryStore::new();
    let state = AppState::new(Repositories::in_memory(store.clone()), &config());
    (store, state)
}

/// Signs up a user over HTTP and returns the session cookie to attach
/// to subsequent requests.
pub async fn signup<S, B>(app: &S, username: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let form = [
        ("username", username.to_string()),
        ("email", format!("{username}@example.com")),
        ("password", "password123".to_string()),
    ];
    let req = TestRequest::post()
        .uri("/auth/signup/")
        .set_form(form)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND, "signup should redirect");
    session_cookie(&resp)
}

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .expect("session cookie missing")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

pub fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .expect("redirect location missing")
        .to_str()
        .unwrap()
}

pub async fn read_json<B>(resp: ServiceResponse<B>) -> serde_json::Value
where
    B: MessageBody + 'static,
{
    let body = test::read_body(resp.map_into_boxed_body()).await;
    serde_json::from_slice(&body).expect("response was not JSON")
}

/// Multipart body for the post form: text fields only.
pub fn multipart(fields: &[(&str, &str)]) -> (String, Vec<u8>) {
    multipart_with_file(fields, None)
}

/// Multipart body with an optional trailing file part.
pub fn multipart_with_file(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, content)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

pub async fn find_user(store: &MemoryStore, username: &str) -> User {
    UserRepository::find_by_username(store, username)
        .await
        .unwrap()
        .expect("user not seeded")
}

pub async fn seed_group(store: &MemoryStore, title: &str, slug: &str) -> Group {
    GroupRepository::create(
        store,
        Group::new(title.into(), slug.into(), format!("about {title}")),
    )
    .await
    .unwrap()
}

pub async fn seed_post(
    store: &MemoryStore,
    author: Uuid,
    text: &str,
    group: Option<Uuid>,
) -> Post {
    PostRepository::create(store, Post::new(author, text.into(), group, None))
        .await
        .unwrap()
}

/// Seeds a post with a fixed publication timestamp so ordering tests
/// are deterministic.
pub async fn seed_post_at(
    store: &MemoryStore,
    author: Uuid,
    text: &str,
    group: Option<Uuid>,
    pub_date: DateTime<Utc>,
) -> Post {
    let mut post = Post::new(author, text.into(), group, None);
    post.pub_date = pub_date;
    PostRepository::create(store, post).await.unwrap()
}
