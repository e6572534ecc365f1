//! JWT token maker implementation.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use labtrack_core::domain::{Role, User};
use labtrack_core::ports::{AuthError, TokenMaker, TokenPayload, TokenPurpose};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// JWT signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            issuer: "labtrack-api".to_string(),
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret =
            std::env::var("TOKEN_SYMMETRIC_KEY").unwrap_or_else(|_| DEFAULT_SECRET.to_string());

        if secret == DEFAULT_SECRET {
            let is_production = std::env::var("ENVIRONMENT")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default token secret in production! Set TOKEN_SYMMETRIC_KEY."
                );
            } else {
                tracing::warn!("Using default token secret. Set TOKEN_SYMMETRIC_KEY for production use.");
            }
        }

        Self {
            secret,
            issuer: std::env::var("TOKEN_ISSUER").unwrap_or_else(|_| "labtrack-api".to_string()),
        }
    }
}

/// Wire claims. `exp`, `iat` and `iss` are the registered names the validator checks.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: Uuid,
    user_id: i64,
    name: String,
    email: String,
    phone_number: Option<String>,
    role: Role,
    purpose: TokenPurpose,
    iss: String,
    iat: i64,
    exp: i64,
}

impl Claims {
    fn into_payload(self) -> Result<TokenPayload, AuthError> {
        let issued_at = DateTime::from_timestamp(self.iat, 0)
            .ok_or_else(|| AuthError::InvalidToken("iat out of range".into()))?;
        let expires_at = DateTime::from_timestamp(self.exp, 0)
            .ok_or_else(|| AuthError::InvalidToken("exp out of range".into()))?;

        Ok(TokenPayload {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            phone_number: self.phone_number,
            role: self.role,
            purpose: self.purpose,
            issuer: self.iss,
            issued_at,
            expires_at,
        })
    }
}

/// HMAC-SHA256 token maker.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Any HMAC variant verifies; everything else is rejected before the signature check.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Self {
            encoding_key,
            decoding_key,
            validation,
            issuer: config.issuer,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }
}

impl TokenMaker for JwtTokenService {
    fn create_token(
        &self,
        user: &User,
        purpose: TokenPurpose,
        duration: TimeDelta,
    ) -> Result<(String, TokenPayload), AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            id: Uuid::new_v4(),
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            role: user.role,
            purpose,
            iss: self.issuer.clone(),
            iat: now,
            exp: now + duration.num_seconds(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        Ok((token, claims.into_payload()?))
    }

    fn verify_token(&self, token: &str) -> Result<TokenPayload, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken(e.to_string()),
                }
            })?;

        token_data.claims.into_payload()
    }
}
