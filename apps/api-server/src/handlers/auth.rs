//! Authentication handlers: login, token refresh, logout and password reset.

use actix_web::{HttpResponse, web};

use labtrack_core::ports::{AuthError, Job, TokenPurpose};
use labtrack_infra::mail::{mask_email, password_reset_email};
use labtrack_shared::ApiResponse;
use labtrack_shared::dto::{
    LoginRequest, LoginResponse, PasswordResetRequest, RefreshTokenRequest, RefreshTokenResponse,
    ResetPasswordQuery, ResetPasswordRequest, validated,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const PASSWORD_RESET_SENT: &str = "password reset email sent";

fn invalid_credentials() -> AppError {
    AuthError::InvalidCredentials.into()
}

/// POST /api/v1/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let credentials = state
        .users
        .find_credentials(&req.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !state
        .passwords
        .verify(&req.password, &credentials.password_hash)?
    {
        tracing::debug!(email = %mask_email(&req.email), "Login rejected");
        return Err(invalid_credentials());
    }

    let user = credentials.user;
    let (access_token, _) =
        state
            .tokens
            .create_token(&user, TokenPurpose::Access, state.config.tokens.access)?;
    let (refresh_token, _) =
        state
            .tokens
            .create_token(&user, TokenPurpose::Refresh, state.config.tokens.refresh)?;

    state
        .users
        .set_refresh_token(user.id, Some(refresh_token.clone()))
        .await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
        user,
    }))
}

/// POST /api/v1/refresh-token
pub async fn refresh_token(
    state: web::Data<AppState>,
    body: web::Json<RefreshTokenRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let payload = state
        .tokens
        .verify_token_for(&req.refresh_token, TokenPurpose::Refresh)?;

    let stored = state.users.refresh_token(payload.user_id).await?;
    if stored.as_deref() != Some(req.refresh_token.as_str()) {
        return Err(AppError::Unauthorized("refresh token not valid".to_string()));
    }

    let user = state
        .users
        .find_by_id(payload.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("refresh token not valid".to_string()))?;

    let (access_token, access_payload) =
        state
            .tokens
            .create_token(&user, TokenPurpose::Access, state.config.tokens.access)?;

    Ok(HttpResponse::Ok().json(RefreshTokenResponse {
        access_token,
        access_token_expires_at: access_payload.expires_at,
    }))
}

/// POST /api/v1/logout
pub async fn logout(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    state.users.set_refresh_token(identity.user_id, None).await?;
    tracing::info!(
        user_id = identity.user_id,
        email = %mask_email(&identity.email),
        "User logged out"
    );
    Ok(HttpResponse::Ok().json(ApiResponse::message("success")))
}

/// POST /api/v1/request-password-reset
///
/// Answers the same way whether or not the address belongs to an account.
pub async fn request_password_reset(
    state: web::Data<AppState>,
    body: web::Json<PasswordResetRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let Some(user) = state.users.find_by_email(&req.email).await? else {
        tracing::debug!(email = %mask_email(&req.email), "Password reset for unknown email");
        return Ok(HttpResponse::Ok().json(ApiResponse::message(PASSWORD_RESET_SENT)));
    };

    let validity = state.config.tokens.password_reset;
    let (token, _) = state
        .tokens
        .create_token(&user, TokenPurpose::PasswordReset, validity)?;

    let message = password_reset_email(
        &user.email,
        &user.name,
        &state.config.frontend_active_url,
        &token,
        validity.num_minutes(),
    );

    match Job::send_email(&message) {
        Ok(job) => {
            if let Err(e) = state.jobs.enqueue(job).await {
                tracing::error!(error = %e, "Failed to enqueue password reset email");
            }
        }
        Err(e) => tracing::error!(error = %e, "Failed to build password reset email job"),
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message(PASSWORD_RESET_SENT)))
}

/// POST /api/v1/reset-password?token=...
pub async fn reset_password(
    state: web::Data<AppState>,
    query: web::Query<ResetPasswordQuery>,
    body: web::Json<ResetPasswordRequest>,
) -> AppResult<HttpResponse> {
    let token = query
        .into_inner()
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("token is required".to_string()))?;

    let req = validated(body.into_inner())?;

    let payload = state
        .tokens
        .verify_token_for(&token, TokenPurpose::PasswordReset)?;

    let password_hash = state.passwords.hash(&req.password)?;
    state
        .users
        .update_password(payload.user_id, password_hash)
        .await?;
    state.users.set_refresh_token(payload.user_id, None).await?;

    tracing::info!(user_id = payload.user_id, "Password reset");

    Ok(HttpResponse::Ok().json(ApiResponse::message("password reset successful")))
}

/// GET /api/v1/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user with id {} not found", identity.user_id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}
