//! The vehicle service talking to a real auth service over HTTP.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, test};
use auth_service::application::auth_service::AuthService;
use auth_service::data::credential_repository::InMemoryCredentialRepository;
use dealer_client::{AuthClientHttp, CachedVerifier};
use dealer_core::security::JwtKeys;
use dealer_core::{Role, TokenVerifier};
use serde_json::{Value, json};
use vehicle_service::application::vehicle_service::VehicleService;
use vehicle_service::configure;
use vehicle_service::data::vehicle_repository::InMemoryVehicleRepository;

struct AuthFixture {
    base_url: String,
    service: AuthService,
    user_id: uuid::Uuid,
}

fn spawn_auth_service() -> AuthFixture {
    let repo = InMemoryCredentialRepository::new();
    let seeded = repo.insert("Carla Dias", "carla@example.com", "senha123", Role::User);
    let service = AuthService::new(
        Arc::new(repo),
        JwtKeys::new("e2e-secret".into(), 3600),
    );

    let served = service.clone();
    let server = HttpServer::new(move || {
        App::new().configure(auth_service::configure(served.clone()))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind ephemeral port");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    AuthFixture {
        base_url: format!("http://{addr}"),
        service,
        user_id: seeded.id,
    }
}

async fn login(service: &AuthService) -> String {
    let (token, _) = service
        .login(Some("carla@example.com"), Some("senha123"))
        .await
        .expect("login");
    token
}

fn civic() -> Value {
    json!({
        "brand": "Honda",
        "model": "Civic",
        "year": 2020,
        "color": "Prata",
        "plate": "ABC1D23",
        "price": 95000.0
    })
}

#[actix_web::test]
async fn token_issued_by_auth_service_is_accepted_end_to_end() {
    let auth = spawn_auth_service();
    let token = login(&auth.service).await;
    let verifier: Arc<dyn TokenVerifier> =
        Arc::new(AuthClientHttp::new(&auth.base_url, Duration::from_secs(2)).unwrap());

    let vehicles = VehicleService::new(Arc::new(InMemoryVehicleRepository::new()));
    let app = test::init_service(App::new().configure(configure(vehicles, verifier))).await;

    let req = test::TestRequest::post()
        .uri("/api/vehicles")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(civic())
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 201);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["vehicle"]["createdBy"], auth.user_id.to_string());

    let req = test::TestRequest::get()
        .uri("/api/vehicles")
        .insert_header(("Authorization", "Bearer token_invalido"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 401);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "invalid token");
}

#[actix_web::test]
async fn token_signed_with_another_secret_is_rejected_remotely() {
    let auth = spawn_auth_service();
    let forged = JwtKeys::new("not-the-secret".into(), 3600)
        .generate_token(&dealer_core::Identity {
            id: auth.user_id,
            role: Role::Admin,
        })
        .unwrap();
    let client = AuthClientHttp::new(&auth.base_url, Duration::from_secs(2)).unwrap();
    assert!(client.verify(&forged).await.is_err());
}

#[actix_web::test]
async fn unreachable_auth_service_fails_closed() {
    let verifier: Arc<dyn TokenVerifier> =
        Arc::new(AuthClientHttp::new("http://127.0.0.1:1", Duration::from_millis(300)).unwrap());
    let vehicles = VehicleService::new(Arc::new(InMemoryVehicleRepository::new()));
    let app = test::init_service(App::new().configure(configure(vehicles, verifier))).await;

    let req = test::TestRequest::get()
        .uri("/api/vehicles")
        .insert_header(("Authorization", "Bearer qualquer"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 401);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "error": "invalid token" }));
}

#[actix_web::test]
async fn cached_verifier_serves_repeat_requests() {
    let auth = spawn_auth_service();
    let token = login(&auth.service).await;
    let client = AuthClientHttp::new(&auth.base_url, Duration::from_secs(2)).unwrap();
    let cached = Arc::new(CachedVerifier::new(client, Duration::from_secs(60), 100));
    let verifier: Arc<dyn TokenVerifier> = cached.clone();

    let vehicles = VehicleService::new(Arc::new(InMemoryVehicleRepository::new()));
    let app = test::init_service(App::new().configure(configure(vehicles, verifier))).await;

    for _ in 0..3 {
        let req = test::TestRequest::get()
            .uri("/api/vehicles")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);
    }
    let identity = cached.verify(&token).await.unwrap();
    assert_eq!(identity.id, auth.user_id);
}
