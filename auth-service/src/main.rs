use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use auth_service::application::auth_service::AuthService;
use auth_service::data::credential_repository::PostgresCredentialRepository;
use auth_service::infrastructure::config::AppConfig;
use auth_service::infrastructure::database::create_pool;
use auth_service::{SERVICE_NAME, configure};
use dealer_core::config::{build_cors, security_headers};
use dealer_core::logging::init_logging;
use dealer_core::middleware::{RequestIdMiddleware, TimingMiddleware};
use dealer_core::security::JwtKeys;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging("auth_service");

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;

    let repo = Arc::new(PostgresCredentialRepository::new(pool));
    let auth_service = AuthService::new(
        repo,
        JwtKeys::new(config.jwt_secret.clone(), config.jwt_ttl_secs),
    );

    let http = config.http.clone();
    info!(service = SERVICE_NAME, host = %http.host, port = http.port, "starting");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(security_headers())
            .wrap(build_cors(&http.cors_origins))
            .configure(configure(auth_service.clone()))
    })
    .bind((config.http.host.as_str(), config.http.port))?
    .run()
    .await?;

    Ok(())
}
