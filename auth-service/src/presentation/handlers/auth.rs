use actix_web::{HttpRequest, HttpResponse, Scope, post, web};
use dealer_core::DomainError;
use dealer_core::identity::bearer_token;
use dealer_core::middleware::request_id;
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::presentation::dto::{LoginRequest, LoginResponse, UserSummary, VerifyResponse};

pub fn scope() -> Scope {
    web::scope("/api/auth").service(login).service(verify)
}

#[post("/login")]
async fn login(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: Option<web::Json<LoginRequest>>,
) -> Result<HttpResponse, DomainError> {
    let payload = payload.map(web::Json::into_inner).unwrap_or_default();
    let (token, credential) = service
        .login(payload.email.as_deref(), payload.password.as_deref())
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %credential.id,
        "user logged in"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        expires_in: service.keys().ttl_secs(),
        user: UserSummary::from(&credential),
    }))
}

#[post("/verify")]
async fn verify(
    req: HttpRequest,
    service: web::Data<AuthService>,
) -> Result<HttpResponse, DomainError> {
    let identity = service.verify(bearer_token(req.headers()))?;
    Ok(HttpResponse::Ok().json(VerifyResponse { user: identity }))
}
