//! HTTP handlers and route configuration.

mod auth;
mod dashboard;
mod devices;
mod experiments;
mod health;
mod reactors;
mod readings;
mod users;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::{json_config, path_config, query_config};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config());

    cfg.service(
        web::scope("/api/v1")
            // Public routes
            .route("/health-check", web::get().to(health::health_check))
            .route("/login", web::post().to(auth::login))
            .route("/refresh-token", web::post().to(auth::refresh_token))
            .route(
                "/request-password-reset",
                web::post().to(auth::request_password_reset),
            )
            .route("/reset-password", web::post().to(auth::reset_password))
            // Authenticated routes
            .route("/logout", web::post().to(auth::logout))
            .route("/me", web::get().to(auth::me))
            .route("/dashboard", web::get().to(dashboard::dashboard))
            .service(
                web::scope("/users")
                    .service(
                        web::resource("")
                            .route(web::get().to(users::list_users))
                            .route(web::post().to(users::create_user)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(users::get_user))
                            .route(web::put().to(users::update_user))
                            .route(web::delete().to(users::delete_user)),
                    ),
            )
            .service(
                web::scope("/reactors")
                    .service(
                        web::resource("")
                            .route(web::get().to(reactors::list_reactors))
                            .route(web::post().to(reactors::create_reactor)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(reactors::get_reactor))
                            .route(web::put().to(reactors::update_reactor))
                            .route(web::delete().to(reactors::delete_reactor)),
                    ),
            )
            .service(
                web::scope("/experiments")
                    .service(
                        web::resource("")
                            .route(web::get().to(experiments::list_experiments))
                            .route(web::post().to(experiments::create_experiment)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(experiments::get_experiment))
                            .route(web::put().to(experiments::update_experiment))
                            .route(web::delete().to(experiments::delete_experiment)),
                    ),
            )
            .service(
                web::scope("/devices")
                    .service(
                        web::resource("")
                            .route(web::get().to(devices::list_devices))
                            .route(web::post().to(devices::create_device)),
                    )
                    // Must precede /{id}
                    .route("/stats", web::get().to(devices::device_stats))
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(devices::get_device))
                            .route(web::put().to(devices::update_device))
                            .route(web::delete().to(devices::delete_device)),
                    ),
            )
            .service(
                web::scope("/readings")
                    .service(
                        web::resource("")
                            .route(web::get().to(readings::list_readings))
                            .route(web::post().to(readings::create_reading)),
                    )
                    .route("/{id}", web::get().to(readings::get_reading)),
            )
            .route(
                "/reports/readings",
                web::post().to(readings::readings_report),
            ),
    );
}
