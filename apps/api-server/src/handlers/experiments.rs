use actix_web::{HttpResponse, web};

use labtrack_shared::dto::ExperimentRequest;
use labtrack_shared::query::ExperimentListQuery;
use labtrack_shared::{ApiResponse, PaginatedResponse};

use crate::middleware::auth::{AdminIdentity, Identity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/experiments
pub async fn create_experiment(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    body: web::Json<ExperimentRequest>,
) -> AppResult<HttpResponse> {
    let draft = body.into_inner().into_draft()?;
    let experiment = state.experiments.create(draft).await?;

    tracing::info!(experiment_id = experiment.id, batch_id = %experiment.batch_id, "Experiment recorded");

    Ok(HttpResponse::Created().json(ApiResponse::ok(experiment)))
}

/// GET /api/v1/experiments
pub async fn list_experiments(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<ExperimentListQuery>,
) -> AppResult<HttpResponse> {
    let filter = query.into_inner().into_filter()?;
    let page = state.experiments.list(&filter).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::from(page)))
}

/// GET /api/v1/experiments/{id}
pub async fn get_experiment(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let experiment = state
        .experiments
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("experiment with id {id} not found")))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(experiment)))
}

/// PUT /api/v1/experiments/{id}
///
/// Replaces every field with the submitted draft.
pub async fn update_experiment(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    path: web::Path<i64>,
    body: web::Json<ExperimentRequest>,
) -> AppResult<HttpResponse> {
    let draft = body.into_inner().into_draft()?;
    let experiment = state.experiments.update(path.into_inner(), draft).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(experiment)))
}

/// DELETE /api/v1/experiments/{id}
pub async fn delete_experiment(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state.experiments.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("experiment deleted successfully")))
}
