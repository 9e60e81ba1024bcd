use actix_web::{HttpResponse, Resource, web};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// `GET /health`, unauthenticated.
pub fn health_resource(service: &'static str) -> Resource {
    web::resource("/health").route(web::get().to(move || async move {
        HttpResponse::Ok().json(HealthResponse {
            status: "OK",
            service,
        })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn reports_ok_with_service_name() {
        let app = test::init_service(App::new().service(health_resource("auth-service"))).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(res.status(), 200);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["service"], "auth-service");
    }
}
