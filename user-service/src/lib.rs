//! User registry: CRUD over `/api/users`.

pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

use actix_web::web;
use dealer_core::extract::{json_config, path_config, query_config};
use dealer_core::health::health_resource;

use crate::application::user_service::UserService;

pub const SERVICE_NAME: &str = "user-service";

pub fn configure(service: UserService) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(service))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config("user"))
            .service(health_resource(SERVICE_NAME))
            .service(presentation::handlers::user::scope());
    }
}
