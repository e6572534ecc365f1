//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use chrono::TimeDelta;
use labtrack_infra::JwtConfig;

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Connection settings; present only when `DATABASE_URL` is set.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

/// Token lifetimes per purpose.
#[derive(Debug, Clone, Copy)]
pub struct TokenDurations {
    pub access: TimeDelta,
    pub refresh: TimeDelta,
    pub password_reset: TimeDelta,
}

impl Default for TokenDurations {
    fn default() -> Self {
        Self {
            access: TimeDelta::minutes(15),
            refresh: TimeDelta::days(7),
            password_reset: TimeDelta::minutes(30),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub database: Option<DatabaseSettings>,
    /// Origins echoed back by CORS.
    pub allowed_origins: Vec<String>,
    /// Base URL used for links inside emails.
    pub frontend_active_url: String,
    pub jwt: JwtConfig,
    pub tokens: TokenDurations,
    pub email_workers: usize,
    pub email_queue_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            database: None,
            allowed_origins: Vec::new(),
            frontend_active_url: "http://localhost:3000".to_string(),
            jwt: JwtConfig::default(),
            tokens: TokenDurations::default(),
            email_workers: 2,
            email_queue_size: 1000,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseSettings {
            url,
            max_connections: var_or("DB_MAX_CONNECTIONS", 20),
            min_connections: var_or("DB_MIN_CONNECTIONS", 2),
            run_migrations: flag("RUN_MIGRATIONS"),
        });

        let allowed_origins = env::var("FRONTEND_URL")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        let tokens = TokenDurations {
            access: TimeDelta::minutes(var_or(
                "TOKEN_DURATION_MINUTES",
                defaults.tokens.access.num_minutes(),
            )),
            refresh: TimeDelta::minutes(var_or(
                "REFRESH_TOKEN_DURATION_MINUTES",
                defaults.tokens.refresh.num_minutes(),
            )),
            password_reset: TimeDelta::minutes(var_or(
                "PASSWORD_RESET_DURATION_MINUTES",
                defaults.tokens.password_reset.num_minutes(),
            )),
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: var_or("PORT", defaults.port),
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            database,
            frontend_active_url: env::var("FRONTEND_ACTIVE_URL")
                .unwrap_or(defaults.frontend_active_url),
            allowed_origins,
            jwt: JwtConfig::from_env(),
            tokens,
            email_workers: var_or("EMAIL_WORKERS", defaults.email_workers),
            email_queue_size: var_or("EMAIL_QUEUE_SIZE", defaults.email_queue_size),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
