//! Authentication extractors.
//!
//! Use [`Identity`] in a handler signature to require a valid access token,
//! and [`AdminIdentity`] to additionally require the admin role:
//! ```ignore
//! async fn delete_reactor(_admin: AdminIdentity, path: web::Path<i64>) -> AppResult<HttpResponse> { .. }
//! ```

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};

use labtrack_core::domain::Role;
use labtrack_core::ports::{AuthError, TokenPayload, TokenPurpose};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated caller, taken from a verified access token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Self-or-admin rule for per-user resources.
    pub fn can_access_user(&self, user_id: i64) -> bool {
        self.is_admin() || self.user_id == user_id
    }
}

impl From<TokenPayload> for Identity {
    fn from(payload: TokenPayload) -> Self {
        Self {
            user_id: payload.user_id,
            email: payload.email,
            role: payload.role,
        }
    }
}

/// Pull the token out of `Bearer <token>`. The scheme is case-insensitive and
/// the header must hold exactly two whitespace-separated fields.
pub fn bearer_token(header_value: &str) -> Result<&str, AppError> {
    let fields: Vec<&str> = header_value.split_whitespace().collect();
    let [scheme, token] = fields.as_slice() else {
        return Err(AppError::Unauthorized(
            "invalid or missing bearer token".to_string(),
        ));
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized(
            "authentication type not supported".to_string(),
        ));
    }

    Ok(*token)
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        return Err(AppError::Internal("AppState not found in app data".to_string()));
    };

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?
        .to_str()
        .map_err(|_| AppError::Unauthorized("invalid authorization header".to_string()))?;

    let token = bearer_token(header_value)?;

    match state.tokens.verify_token_for(token, TokenPurpose::Access) {
        Ok(payload) => Ok(Identity::from(payload)),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected access token");
            Err(AppError::Unauthorized("access token not valid".to_string()))
        }
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Authenticated caller holding the admin role. Non-admins get `forbidden`
/// before the handler body runs.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

impl FromRequest for AdminIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = authenticate(req).and_then(|identity| {
            if identity.is_admin() {
                Ok(AdminIdentity(identity))
            } else {
                Err(AuthError::InsufficientPermissions.into())
            }
        });
        ready(result)
    }
}
