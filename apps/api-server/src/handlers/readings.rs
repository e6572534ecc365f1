//! Sensor readings and their CSV export.

use actix_web::{
    HttpResponse,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web,
};

use labtrack_shared::dto::{CreateReadingRequest, ReadingReportRequest};
use labtrack_shared::query::{ReadingListQuery, ReadingListing};
use labtrack_shared::{ApiResponse, PaginatedResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/readings
pub async fn create_reading(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<CreateReadingRequest>,
) -> AppResult<HttpResponse> {
    let reading = state
        .readings
        .create(body.into_inner().into_new_reading()?)
        .await?;

    tracing::debug!(reading_id = reading.id, device_id = reading.device_id, "Reading stored");

    Ok(HttpResponse::Created().json(ApiResponse::ok(reading)))
}

/// GET /api/v1/readings/{id}
pub async fn get_reading(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let reading = state
        .readings
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("reading with id {id} not found")))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(reading)))
}

/// GET /api/v1/readings?list_by=device|timeslot|date
///
/// Only the per-device listing is paginated; the other two return every
/// matching reading, oldest first.
pub async fn list_readings(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<ReadingListQuery>,
) -> AppResult<HttpResponse> {
    match query.into_inner().into_listing()? {
        ReadingListing::Device(filter) => {
            let page = state.readings.list_by_device(&filter).await?;
            Ok(HttpResponse::Ok().json(PaginatedResponse::from(page)))
        }
        ReadingListing::Timeslot {
            device_id,
            start,
            end,
        } => {
            let readings = state.readings.list_by_range(device_id, start, end).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::ok(readings)))
        }
        ReadingListing::Date { device_id, date } => {
            let readings = state.readings.list_by_date(device_id, date).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::ok(readings)))
        }
    }
}

/// POST /api/v1/reports/readings
pub async fn readings_report(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<ReadingReportRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let (start, end) = req.time_range()?;

    let device = state
        .devices
        .find_by_id(req.device_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("device with id {} not found", req.device_id)))?;

    let readings = state.readings.list_by_range(device.id, start, end).await?;
    let report = state.reports.readings_report(&device, &readings)?;

    tracing::info!(
        device_id = device.id,
        rows = readings.len(),
        file = %report.file_name,
        "Readings report generated"
    );

    Ok(HttpResponse::Ok()
        .content_type(report.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(report.file_name)],
        })
        .body(report.bytes))
}
