use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use dealer_core::config::{build_cors, security_headers};
use dealer_core::logging::init_logging;
use dealer_core::middleware::{RequestIdMiddleware, TimingMiddleware};
use tracing::info;
use vehicle_service::application::vehicle_service::VehicleService;
use vehicle_service::data::vehicle_repository::PostgresVehicleRepository;
use vehicle_service::infrastructure::auth_client::build_verifier;
use vehicle_service::infrastructure::config::AppConfig;
use vehicle_service::infrastructure::database::{create_pool, run_migrations};
use vehicle_service::{SERVICE_NAME, configure};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging("vehicle_service");

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let verifier = build_verifier(
        &config.auth_service_url,
        config.verify_timeout,
        config.verify_cache_ttl,
    )?;

    let repo = Arc::new(PostgresVehicleRepository::new(pool));
    let vehicle_service = VehicleService::new(repo)
        .with_update_mode(config.update_mode)
        .with_policy(config.mutation_policy)
        .with_max_page_limit(config.max_page_limit);

    let http = config.http.clone();
    info!(
        service = SERVICE_NAME,
        host = %http.host,
        port = http.port,
        update_mode = ?config.update_mode,
        policy = ?config.mutation_policy,
        "starting"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(security_headers())
            .wrap(build_cors(&http.cors_origins))
            .configure(configure(vehicle_service.clone(), Arc::clone(&verifier)))
    })
    .bind((config.http.host.as_str(), config.http.port))?
    .run()
    .await?;

    Ok(())
}
