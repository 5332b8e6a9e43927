pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

use std::sync::Arc;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlers;
use actix_web::{App, Error, web};
use sqlx::PgPool;

use application::auth_service::AuthService;
use application::feed_service::FeedService;
use application::follow_service::FollowService;
use application::post_service::PostService;
use data::comment_repository::{CommentRepository, PostgresCommentRepository};
use data::follow_repository::{FollowRepository, PostgresFollowRepository};
use data::group_repository::{GroupRepository, PostgresGroupRepository};
use data::memory::MemoryStore;
use data::post_repository::{PostRepository, PostgresPostRepository};
use data::user_repository::{PostgresUserRepository, UserRepository};
use infrastructure::cache::PageCache;
use infrastructure::config::AppConfig;
use infrastructure::media::MediaStore;
use infrastructure::security::SessionKeys;
use presentation::handlers;
use presentation::middleware::{RequestIdMiddleware, SessionMiddleware, TimingMiddleware};

/// The repository set behind the services; Postgres in production, the
/// in-memory store in tests.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            groups: Arc::new(PostgresGroupRepository::new(pool.clone())),
            posts: Arc::new(PostgresPostRepository::new(pool.clone())),
            comments: Arc::new(PostgresCommentRepository::new(pool.clone())),
            follows: Arc::new(PostgresFollowRepository::new(pool)),
        }
    }

    pub fn in_memory(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            groups: Arc::new(store.clone()),
            posts: Arc::new(store.clone()),
            comments: Arc::new(store.clone()),
            follows: Arc::new(store),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub feeds: FeedService,
    pub posts: PostService,
    pub follows: FollowService,
    pub cache: Arc<PageCache>,
    pub media: MediaStore,
}

impl AppState {
    pub fn new(repos: Repositories, config: &AppConfig) -> Self {
        let keys = SessionKeys::new(config.session_secret.clone());
        Self {
            auth: AuthService::new(Arc::clone(&repos.users), keys),
            feeds: FeedService::new(
                Arc::clone(&repos.posts),
                Arc::clone(&repos.groups),
                Arc::clone(&repos.users),
                config.page_size,
            ),
            posts: PostService::new(
                Arc::clone(&repos.posts),
                Arc::clone(&repos.comments),
                Arc::clone(&repos.groups),
                Arc::clone(&repos.users),
            ),
            follows: FollowService::new(Arc::clone(&repos.users), repos.follows),
            cache: Arc::new(PageCache::new(Duration::from_secs(
                config.index_cache_ttl_secs,
            ))),
            media: MediaStore::new(config.media_root.clone(), config.max_image_bytes),
        }
    }
}

/// Assembles the application; shared by the binary and the test suite
/// so both exercise the same routes and middleware. Route registration
/// order matters: the literal segments (`/new/`, `/follow/`, `/group/`,
/// `/auth/`) must come before the `{username}` catch-alls.
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(
            ErrorHandlers::new()
                .handler(StatusCode::NOT_FOUND, handlers::errors::render_not_found)
                .handler(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    handlers::errors::render_server_error,
                ),
        )
        .wrap(SessionMiddleware)
        .wrap(TimingMiddleware)
        .wrap(RequestIdMiddleware)
        .app_data(web::Data::new(state.auth))
        .app_data(web::Data::new(state.feeds))
        .app_data(web::Data::new(state.posts))
        .app_data(web::Data::new(state.follows))
        .app_data(web::Data::from(state.cache))
        .app_data(web::Data::new(state.media))
        .service(handlers::feed::index)
        .service(handlers::post::new_post_form)
        .service(handlers::post::create_post)
        .service(handlers::feed::follow_feed)
        .service(handlers::feed::group_feed)
        .service(handlers::auth::scope())
        .service(handlers::feed::profile)
        .service(handlers::follow::profile_follow)
        .service(handlers::follow::profile_unfollow)
        .service(handlers::post::post_detail)
        .service(handlers::post::edit_post_form)
        .service(handlers::post::edit_post)
        .service(handlers::comment::add_comment)
        .default_service(web::route().to(handlers::errors::not_found))
}
