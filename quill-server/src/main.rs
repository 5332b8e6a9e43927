use actix_web::HttpServer;
use tracing::info;

use quill_server::infrastructure::config::AppConfig;
use quill_server::infrastructure::database::{create_pool, run_migrations};
use quill_server::infrastructure::logging::init_logging;
use quill_server::{AppState, Repositories, build_app};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let state = AppState::new(Repositories::postgres(pool), &config);

    info!(host = %config.host, port = config.port, "quill listening");

    HttpServer::new(move || build_app(state.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    Ok(())
}
