//! Vehicle inventory: CRUD over `/api/vehicles`, every route behind a bearer
//! token that the auth service must vouch for.

pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

use std::sync::Arc;

use actix_web::web;
use dealer_core::TokenVerifier;
use dealer_core::extract::{json_config, path_config, query_config};
use dealer_core::health::health_resource;

use crate::application::vehicle_service::VehicleService;
use crate::presentation::middleware::RemoteAuthMiddleware;

pub const SERVICE_NAME: &str = "vehicle-service";

/// `/health` stays public; the vehicle scope is gated by `verifier`.
pub fn configure(
    service: VehicleService,
    verifier: Arc<dyn TokenVerifier>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(service))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config("vehicle"))
            .service(health_resource(SERVICE_NAME))
            .service(
                web::scope("/api/vehicles")
                    .configure(presentation::handlers::vehicle::routes)
                    .wrap(RemoteAuthMiddleware::new(verifier)),
            );
    }
}
