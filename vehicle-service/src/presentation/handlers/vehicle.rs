use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use dealer_core::middleware::request_id;
use dealer_core::pagination::PageRequest;
use dealer_core::{DomainError, Identity};
use tracing::info;
use uuid::Uuid;

use crate::application::vehicle_service::VehicleService;
use crate::presentation::dto::{
    ListVehiclesQuery, MessageResponse, VehicleCreatedResponse, VehicleInput, VehicleListResponse,
    VehicleResponse,
};

/// Routes mounted under `/api/vehicles`; every one expects the auth gate to
/// have run.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_vehicle)
        .service(list_vehicles)
        .service(get_vehicle)
        .service(update_vehicle)
        .service(delete_vehicle);
}

#[post("")]
async fn create_vehicle(
    req: HttpRequest,
    identity: Identity,
    service: web::Data<VehicleService>,
    payload: web::Json<VehicleInput>,
) -> Result<HttpResponse, DomainError> {
    let vehicle = service.create(&identity, payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %identity.id,
        vehicle_id = %vehicle.id,
        "vehicle registered"
    );

    Ok(HttpResponse::Created().json(VehicleCreatedResponse {
        message: "vehicle created successfully",
        vehicle,
    }))
}

#[get("")]
async fn list_vehicles(
    service: web::Data<VehicleService>,
    query: web::Query<ListVehiclesQuery>,
) -> Result<HttpResponse, DomainError> {
    let filter = query.filter()?;
    let page = PageRequest::from_query(query.page, query.limit, service.max_page_limit())?;
    let (vehicles, pagination) = service.list(&filter, page).await?;

    Ok(HttpResponse::Ok().json(VehicleListResponse {
        vehicles,
        pagination,
    }))
}

#[get("/{id}")]
async fn get_vehicle(
    service: web::Data<VehicleService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let vehicle = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(VehicleResponse { vehicle }))
}

#[put("/{id}")]
async fn update_vehicle(
    req: HttpRequest,
    identity: Identity,
    service: web::Data<VehicleService>,
    path: web::Path<Uuid>,
    payload: web::Json<VehicleInput>,
) -> Result<HttpResponse, DomainError> {
    let vehicle = service
        .update(&identity, path.into_inner(), payload.into_inner())
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %identity.id,
        vehicle_id = %vehicle.id,
        "vehicle updated"
    );

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "vehicle updated successfully",
    }))
}

#[delete("/{id}")]
async fn delete_vehicle(
    req: HttpRequest,
    identity: Identity,
    service: web::Data<VehicleService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    service.delete(&identity, id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %identity.id,
        vehicle_id = %id,
        "vehicle deleted"
    );

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "vehicle deleted successfully",
    }))
}
