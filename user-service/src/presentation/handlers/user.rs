use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use dealer_core::DomainError;
use dealer_core::middleware::request_id;
use dealer_core::pagination::PageRequest;
use tracing::info;
use uuid::Uuid;

use crate::application::user_service::UserService;
use crate::presentation::dto::{
    CreateUserRequest, ListUsersQuery, MessageResponse, UpdateUserRequest, UserCreatedResponse,
    UserListResponse, UserResponse,
};

pub fn scope() -> Scope {
    web::scope("/api/users")
        .service(create_user)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
}

#[post("")]
async fn create_user(
    req: HttpRequest,
    service: web::Data<UserService>,
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, DomainError> {
    let user = service.create(payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        "user registered"
    );

    Ok(HttpResponse::Created().json(UserCreatedResponse {
        message: "user created successfully",
        user: user.into(),
    }))
}

#[get("")]
async fn list_users(
    service: web::Data<UserService>,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = PageRequest::from_query(query.page, query.limit, service.max_page_limit())?;
    let (users, pagination) = service.list(page).await?;

    Ok(HttpResponse::Ok().json(UserListResponse {
        users: users.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

#[get("/{id}")]
async fn get_user(
    service: web::Data<UserService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let user = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse { user: user.into() }))
}

#[put("/{id}")]
async fn update_user(
    req: HttpRequest,
    service: web::Data<UserService>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, DomainError> {
    let user = service
        .update(path.into_inner(), payload.into_inner())
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        "user updated"
    );

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "user updated successfully",
    }))
}

#[delete("/{id}")]
async fn delete_user(
    req: HttpRequest,
    service: web::Data<UserService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    service.delete(id).await?;

    info!(request_id = %request_id(&req), user_id = %id, "user deleted");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "user deleted successfully",
    }))
}
