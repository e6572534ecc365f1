//! User management handlers.

use actix_web::{HttpResponse, web};

use labtrack_shared::dto::{CreateUserRequest, UpdateUserRequest};
use labtrack_shared::query::UserListQuery;
use labtrack_shared::{ApiResponse, PaginatedResponse};

use crate::middleware::auth::{AdminIdentity, Identity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn forbidden() -> AppError {
    AppError::Forbidden("access to the requested resource is forbidden".to_string())
}

fn user_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("user with id {id} not found"))
}

/// POST /api/v1/users
pub async fn create_user(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let (new_user, password) = body.into_inner().into_new_user()?;

    if state.users.find_by_email(&new_user.email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "user with email {} already exists",
            new_user.email
        )));
    }

    let password_hash = state.passwords.hash(&password)?;
    let user = state.users.create(new_user, password_hash).await?;

    tracing::info!(user_id = user.id, "User created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(user)))
}

/// GET /api/v1/users
pub async fn list_users(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    query: web::Query<UserListQuery>,
) -> AppResult<HttpResponse> {
    let filter = query.into_inner().into_filter()?;
    let page = state.users.list(&filter).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::from(page)))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !identity.can_access_user(id) {
        return Err(forbidden());
    }

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

/// PUT /api/v1/users/{id}
///
/// Self or admin; only admins may touch `role`.
pub async fn update_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    if !identity.can_access_user(id) || (req.changes_role() && !identity.is_admin()) {
        return Err(forbidden());
    }

    let update = req.into_update()?;

    if let Some(email) = &update.email {
        if let Some(existing) = state.users.find_by_email(email).await? {
            if existing.id != id {
                return Err(AppError::Conflict(format!(
                    "user with email {email} already exists"
                )));
            }
        }
    }

    state.users.update(id, update).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("user updated successfully")))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.users.delete(id).await?;

    tracing::info!(user_id = id, "User deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("user deleted successfully")))
}
