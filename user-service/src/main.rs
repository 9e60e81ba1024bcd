use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use dealer_core::config::{build_cors, security_headers};
use dealer_core::logging::init_logging;
use dealer_core::middleware::{RequestIdMiddleware, TimingMiddleware};
use tracing::info;
use user_service::application::user_service::UserService;
use user_service::data::user_repository::PostgresUserRepository;
use user_service::infrastructure::config::AppConfig;
use user_service::infrastructure::database::{create_pool, run_migrations};
use user_service::{SERVICE_NAME, configure};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging("user_service");

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let repo = Arc::new(PostgresUserRepository::new(pool));
    let user_service = UserService::new(repo, config.max_page_limit);

    let http = config.http.clone();
    info!(service = SERVICE_NAME, host = %http.host, port = http.port, "starting");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(security_headers())
            .wrap(build_cors(&http.cors_origins))
            .configure(configure(user_service.clone()))
    })
    .bind((config.http.host.as_str(), config.http.port))?
    .run()
    .await?;

    Ok(())
}
