//! Token issuer/verifier: `POST /api/auth/login` and `POST /api/auth/verify`.

pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

use actix_web::web;
use dealer_core::extract::json_config;
use dealer_core::health::health_resource;

use crate::application::auth_service::AuthService;

pub const SERVICE_NAME: &str = "auth-service";

/// Registers every route of the service against the given state.
pub fn configure(service: AuthService) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(service))
            .app_data(json_config())
            .service(health_resource(SERVICE_NAME))
            .service(presentation::handlers::auth::scope());
    }
}
