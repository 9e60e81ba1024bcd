use std::sync::Arc;

use actix_web::{App, test};
use auth_service::application::auth_service::AuthService;
use auth_service::configure;
use auth_service::data::credential_repository::InMemoryCredentialRepository;
use auth_service::domain::credential::Credential;
use dealer_core::Role;
use dealer_core::security::JwtKeys;
use rstest::rstest;
use serde_json::{Value, json};

fn fixture() -> (AuthService, Credential) {
    let repo = InMemoryCredentialRepository::new();
    let seeded = repo.insert("Ana Souza", "ana@example.com", "senha123", Role::User);
    (
        AuthService::new(Arc::new(repo), JwtKeys::new("integration-secret".into(), 3600)),
        seeded,
    )
}

macro_rules! app {
    ($service:expr) => {
        test::init_service(App::new().configure(configure($service))).await
    };
}

#[actix_web::test]
async fn health_names_the_service() {
    let (service, _) = fixture();
    let app = app!(service);
    let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(res.status(), 200);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "status": "OK", "service": "auth-service" }));
}

#[actix_web::test]
async fn login_returns_token_and_public_user() {
    let (service, seeded) = fixture();
    let app = app!(service);
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ana@example.com", "password": "senha123" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let body: Value = test::read_body_json(res).await;
    assert!(body["token"].as_str().is_some_and(|t| t.split('.').count() == 3));
    assert_eq!(body["user"]["id"], seeded.id.to_string());
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());
}

#[rstest]
#[case(json!({ "password": "senha123" }))]
#[case(json!({ "email": "test@email.com" }))]
#[case(json!({ "email": "", "password": "" }))]
#[case(json!({}))]
#[actix_web::test]
async fn login_without_fields_is_bad_request(#[case] payload: Value) {
    let (service, _) = fixture();
    let app = app!(service);
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(payload)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 400);
    let body: Value = test::read_body_json(res).await;
    assert!(body["error"].as_str().unwrap().contains("required"));
}

#[actix_web::test]
async fn login_with_empty_body_is_bad_request() {
    let (service, _) = fixture();
    let app = app!(service);
    let req = test::TestRequest::post().uri("/api/auth/login").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 400);
}

#[rstest]
#[case("ghost@example.com", "senha123")]
#[case("ana@example.com", "senha-errada")]
#[actix_web::test]
async fn bad_credentials_share_one_response(#[case] email: &str, #[case] password: &str) {
    let (service, _) = fixture();
    let app = app!(service);
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 401);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "error": "invalid credentials" }));
}

#[actix_web::test]
async fn verify_without_token_is_unauthorized() {
    let (service, _) = fixture();
    let app = app!(service);
    let res = test::call_service(
        &app,
        test::TestRequest::post().uri("/api/auth/verify").to_request(),
    )
    .await;
    assert_eq!(res.status(), 401);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "no token provided");
}

#[actix_web::test]
async fn verify_rejects_garbage_token() {
    let (service, _) = fixture();
    let app = app!(service);
    let req = test::TestRequest::post()
        .uri("/api/auth/verify")
        .insert_header(("Authorization", "Bearer token_invalido"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 401);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "invalid token");
}

#[actix_web::test]
async fn verify_returns_identity_of_issued_token() {
    let (service, seeded) = fixture();
    let app = app!(service);

    let login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ana@example.com", "password": "senha123" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, login).await;
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/auth/verify")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({ "user": { "id": seeded.id.to_string(), "role": "user" } })
    );
}
