use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};
use user_service::application::user_service::UserService;
use user_service::configure;
use user_service::data::user_repository::InMemoryUserRepository;

fn service() -> UserService {
    UserService::new(Arc::new(InMemoryUserRepository::new()), 100)
}

macro_rules! app {
    ($service:expr) => {
        test::init_service(App::new().configure(configure($service))).await
    };
}

fn joao() -> Value {
    json!({
        "name": "João Silva",
        "email": "joao@example.com",
        "password": "senha123"
    })
}

#[actix_web::test]
async fn create_returns_public_representation() {
    let app = app!(service());
    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(joao())
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 201);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "user created successfully");
    assert_eq!(body["user"]["email"], "joao@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"]["createdAt"].is_string());
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
}

#[actix_web::test]
async fn duplicate_email_is_conflict() {
    let app = app!(service());
    let first = test::TestRequest::post().uri("/api/users").set_json(joao()).to_request();
    assert_eq!(test::call_service(&app, first).await.status(), 201);

    let second = test::TestRequest::post().uri("/api/users").set_json(joao()).to_request();
    let res = test::call_service(&app, second).await;
    assert_eq!(res.status(), 409);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "email already registered");
}

#[rstest]
#[case(json!({ "email": "a@b.com", "password": "senha123" }), "name is required")]
#[case(json!({ "name": "Jo", "email": "a@b.com", "password": "senha123" }), "name must be between 3 and 100 characters")]
#[case(json!({ "name": "João", "email": "invalido", "password": "senha123" }), "email must be a valid email address")]
#[case(json!({ "name": "João", "email": "a@b.com", "password": "123" }), "password must be at least 6 characters")]
#[actix_web::test]
async fn create_reports_first_violation(#[case] payload: Value, #[case] expected: &str) {
    let app = app!(service());
    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(payload)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 400);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], expected);
}

#[actix_web::test]
async fn get_after_create_matches() {
    let app = app!(service());
    let req = test::TestRequest::post().uri("/api/users").set_json(joao()).to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["user"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get().uri(&format!("/api/users/{id}")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["user"], created["user"]);
}

#[rstest]
#[case("/api/users/00000000-0000-0000-0000-000000000000")]
#[case("/api/users/nao-e-um-uuid")]
#[actix_web::test]
async fn unknown_or_malformed_id_is_not_found(#[case] uri: &str) {
    let app = app!(service());
    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), 404);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "user not found");
}

#[actix_web::test]
async fn update_then_get_reflects_change() {
    let app = app!(service());
    let req = test::TestRequest::post().uri("/api/users").set_json(joao()).to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["user"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{id}"))
        .set_json(json!({ "name": "João Souza" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "message": "user updated successfully" }));

    let req = test::TestRequest::get().uri(&format!("/api/users/{id}")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["name"], "João Souza");
    assert_eq!(body["user"]["email"], "joao@example.com");
}

#[actix_web::test]
async fn update_with_empty_body_is_bad_request() {
    let app = app!(service());
    let req = test::TestRequest::post().uri("/api/users").set_json(joao()).to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["user"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{id}"))
        .set_json(json!({}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 400);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "at least one field must be provided");
}

#[actix_web::test]
async fn delete_then_get_is_not_found() {
    let app = app!(service());
    let req = test::TestRequest::post().uri("/api/users").set_json(joao()).to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["user"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete().uri(&format!("/api/users/{id}")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "message": "user deleted successfully" }));

    let req = test::TestRequest::get().uri(&format!("/api/users/{id}")).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::delete().uri(&format!("/api/users/{id}")).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn pages_concatenate_to_the_whole_collection() {
    let app = app!(service());
    let mut created = Vec::new();
    for i in 0..23 {
        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({
                "name": format!("Usuário {i:02}"),
                "email": format!("user{i}@example.com"),
                "password": "senha123"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        created.push(body["user"]["id"].as_str().unwrap().to_string());
    }

    let mut seen = Vec::new();
    for page in 1..=5 {
        let req = test::TestRequest::get()
            .uri(&format!("/api/users?page={page}&limit=5"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["pagination"],
            json!({ "page": page, "limit": 5, "total": 23, "totalPages": 5 })
        );
        for user in body["users"].as_array().unwrap() {
            seen.push(user["id"].as_str().unwrap().to_string());
        }
    }

    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 23);
    created.reverse();
    assert_eq!(seen, created, "pages run newest first");
}

#[actix_web::test]
async fn list_defaults_and_clamps_limit() {
    let app = app!(UserService::new(Arc::new(InMemoryUserRepository::new()), 50));

    let req = test::TestRequest::get().uri("/api/users").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!({ "users": [], "pagination": { "page": 1, "limit": 10, "total": 0, "totalPages": 0 } })
    );

    let req = test::TestRequest::get().uri("/api/users?limit=1000").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["limit"], 50);
}

#[rstest]
#[case("/api/users?page=0")]
#[case("/api/users?limit=-1")]
#[case("/api/users?page=abc")]
#[actix_web::test]
async fn bad_pagination_is_rejected(#[case] uri: &str) {
    let app = app!(service());
    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), 400);
}
