use actix_web::{HttpResponse, web};

use labtrack_shared::dto::{CreateReactorRequest, UpdateReactorRequest};
use labtrack_shared::query::ReactorListQuery;
use labtrack_shared::{ApiResponse, PaginatedResponse};

use crate::middleware::auth::{AdminIdentity, Identity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/reactors
pub async fn create_reactor(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    body: web::Json<CreateReactorRequest>,
) -> AppResult<HttpResponse> {
    let reactor = state
        .reactors
        .create(body.into_inner().into_new_reactor()?)
        .await?;

    tracing::info!(reactor_id = reactor.id, "Reactor created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(reactor)))
}

/// GET /api/v1/reactors
pub async fn list_reactors(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<ReactorListQuery>,
) -> AppResult<HttpResponse> {
    let filter = query.into_inner().into_filter()?;
    let page = state.reactors.list(&filter).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::from(page)))
}

/// GET /api/v1/reactors/{id}
pub async fn get_reactor(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let reactor = state
        .reactors
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("reactor with id {id} not found")))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(reactor)))
}

/// PUT /api/v1/reactors/{id}
pub async fn update_reactor(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    path: web::Path<i64>,
    body: web::Json<UpdateReactorRequest>,
) -> AppResult<HttpResponse> {
    let update = body.into_inner().into_update()?;
    let reactor = state.reactors.update(path.into_inner(), update).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(reactor)))
}

/// DELETE /api/v1/reactors/{id}
pub async fn delete_reactor(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.reactors.delete(id).await?;

    tracing::info!(reactor_id = id, "Reactor deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("reactor deleted successfully")))
}
