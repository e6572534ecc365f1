use actix_web::{HttpResponse, web};
use serde_json::json;

use labtrack_core::filter::DeviceFilter;
use labtrack_shared::ApiResponse;
use labtrack_shared::dto::{CreateDeviceRequest, UpdateDeviceRequest};
use labtrack_shared::query::DeviceListQuery;

use crate::middleware::auth::{AdminIdentity, Identity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/devices
pub async fn create_device(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    body: web::Json<CreateDeviceRequest>,
) -> AppResult<HttpResponse> {
    let device = state
        .devices
        .create(body.into_inner().into_new_device()?)
        .await?;

    tracing::info!(device_id = device.id, reactor_id = device.reactor_id, "Device registered");

    Ok(HttpResponse::Created().json(ApiResponse::ok(device)))
}

/// GET /api/v1/devices
pub async fn list_devices(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<DeviceListQuery>,
) -> AppResult<HttpResponse> {
    let filter = DeviceFilter::from(query.into_inner());
    let devices = state.devices.list(&filter).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(devices)))
}

/// GET /api/v1/devices/stats
pub async fn device_stats(
    state: web::Data<AppState>,
    _identity: Identity,
) -> AppResult<HttpResponse> {
    let stats = state.devices.stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

/// GET /api/v1/devices/{id}
pub async fn get_device(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let device = state
        .devices
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("device with id {id} not found")))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(device)))
}

/// PUT /api/v1/devices/{id}
pub async fn update_device(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    path: web::Path<i64>,
    body: web::Json<UpdateDeviceRequest>,
) -> AppResult<HttpResponse> {
    let device = state
        .devices
        .update(path.into_inner(), body.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(device)))
}

/// DELETE /api/v1/devices/{id}
///
/// Also removes the device's readings.
pub async fn delete_device(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.devices.delete(id).await?;

    tracing::info!(device_id = id, "Device deleted");

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
