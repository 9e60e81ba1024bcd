use std::future::{Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, ResponseError};
use dealer_core::identity::bearer_token;
use dealer_core::{AuthError, DomainError, TokenVerifier};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

/// Admits a request only once the auth service has vouched for its bearer
/// token. The resolved [`dealer_core::Identity`] is stored in the request
/// extensions for handlers to extract.
///
/// Every failure, whether a missing header, a rejection or an unreachable
/// verifier, ends the request with 401 before the wrapped service runs.
pub struct RemoteAuthMiddleware {
    verifier: Arc<dyn TokenVerifier>,
}

impl RemoteAuthMiddleware {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RemoteAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RemoteAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RemoteAuthService {
            service: Rc::new(service),
            verifier: Arc::clone(&self.verifier),
        }))
    }
}

pub struct RemoteAuthService<S> {
    service: Rc<S>,
    verifier: Arc<dyn TokenVerifier>,
}

impl<S, B> Service<ServiceRequest> for RemoteAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let verifier = Arc::clone(&self.verifier);
        let token = bearer_token(req.headers()).map(str::to_owned);

        Box::pin(async move {
            let verified = match token {
                Some(token) => verifier.verify(&token).await,
                None => Err(AuthError::MissingToken),
            };

            match verified {
                Ok(identity) => {
                    debug!(user_id = %identity.id, path = %req.path(), "request authorized");
                    req.extensions_mut().insert(identity);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    warn!(path = %req.path(), reason = %err, "request rejected by auth gate");
                    let response = DomainError::from(err).error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};
    use async_trait::async_trait;
    use dealer_core::{Identity, Role};
    use serde_json::Value;
    use uuid::Uuid;

    struct Fixed;

    #[async_trait]
    impl TokenVerifier for Fixed {
        async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
            match token {
                "good" => Ok(Identity {
                    id: Uuid::from_u128(7),
                    role: Role::User,
                }),
                _ => Err(AuthError::InvalidToken),
            }
        }
    }

    async fn whoami(identity: Identity) -> HttpResponse {
        HttpResponse::Ok().body(identity.id.to_string())
    }

    macro_rules! gated {
        () => {
            test::init_service(
                App::new().service(
                    web::scope("/private")
                        .wrap(RemoteAuthMiddleware::new(Arc::new(Fixed)))
                        .route("", web::get().to(whoami)),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn missing_header_is_rejected_with_no_token_message() {
        let app = gated!();
        let res = test::call_service(&app, test::TestRequest::get().uri("/private").to_request()).await;
        assert_eq!(res.status(), 401);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "no token provided");
    }

    #[actix_web::test]
    async fn non_bearer_scheme_counts_as_missing() {
        let app = gated!();
        let req = test::TestRequest::get()
            .uri("/private")
            .insert_header(("Authorization", "Basic Zm9vOmJhcg=="))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 401);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "no token provided");
    }

    #[actix_web::test]
    async fn rejected_token_is_invalid() {
        let app = gated!();
        let req = test::TestRequest::get()
            .uri("/private")
            .insert_header(("Authorization", "Bearer bogus"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 401);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "invalid token");
    }

    #[actix_web::test]
    async fn accepted_token_reaches_handler_with_identity() {
        let app = gated!();
        let req = test::TestRequest::get()
            .uri("/private")
            .insert_header(("Authorization", "Bearer good"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, Uuid::from_u128(7).to_string().as_bytes());
    }
}
