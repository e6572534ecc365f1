//! # LabTrack API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::cors::CorsMiddleware;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    let (host, port) = (config.host.clone(), config.port);
    let allowed_origins = config.allowed_origins.clone();

    tracing::info!(
        environment = %config.environment,
        origins = allowed_origins.len(),
        "Starting LabTrack API Server on {}:{}",
        host,
        port
    );

    if config.is_production() && allowed_origins.is_empty() {
        tracing::warn!("FRONTEND_URL not set. Cross-origin requests will not be allowed.");
    }

    let state = match AppState::new(config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            tracing::error!(error = %e, "Startup aborted");
            return Err(std::io::Error::other(e));
        }
    };

    HttpServer::new(move || {
        App::new()
            .wrap(CorsMiddleware::new(allowed_origins.clone()))
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(handlers::configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
