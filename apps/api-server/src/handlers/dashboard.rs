use actix_web::{HttpResponse, web};
use chrono::Utc;

use labtrack_shared::ApiResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/dashboard
///
/// User totals are only filled in for admins.
pub async fn dashboard(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let stats = state
        .dashboard
        .dashboard_stats(identity.is_admin(), Utc::now().date_naive())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}
