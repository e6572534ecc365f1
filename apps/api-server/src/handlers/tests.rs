//! End-to-end tests over the in-memory repositories.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, http::StatusCode, http::header, test, web};
use chrono::{TimeDelta, TimeZone, Utc};
use serde_json::{Value, json};

use labtrack_core::domain::{
    NewDevice, NewReactor, NewReading, NewUser, ReactorStatus, ReadingPayload, Role, User,
};
use labtrack_core::ports::{EmailMessage, TokenPurpose};
use labtrack_infra::{InMemoryDatabase, LogMailer};

use super::configure_routes;
use crate::config::AppConfig;
use crate::state::{AppState, Repositories};

const PASSWORD: &str = "correct-horse";

struct Harness {
    state: AppState,
    db: Arc<InMemoryDatabase>,
    mailer: Arc<LogMailer>,
}

async fn harness() -> Harness {
    let db = Arc::new(InMemoryDatabase::new());
    let mailer = Arc::new(LogMailer::default());
    let state = AppState::build(
        AppConfig::default(),
        Repositories::shared(db.clone()),
        mailer.clone(),
    )
    .await;

    Harness { state, db, mailer }
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

async fn seed_user(state: &AppState, email: &str, role: Role) -> User {
    let hash = state.passwords.hash(PASSWORD).unwrap();
    state
        .users
        .create(
            NewUser {
                name: email.split('@').next().unwrap_or("user").to_string(),
                email: email.to_string(),
                phone_number: None,
                role,
                is_active: true,
            },
            hash,
        )
        .await
        .unwrap()
}

fn bearer(state: &AppState, user: &User, purpose: TokenPurpose) -> String {
    let (token, _) = state
        .tokens
        .create_token(user, purpose, TimeDelta::minutes(15))
        .unwrap();
    format!("Bearer {token}")
}

async fn wait_for_mail(mailer: &LogMailer) -> Vec<EmailMessage> {
    for _ in 0..50 {
        let sent = mailer.sent().await;
        if !sent.is_empty() {
            return sent;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    mailer.sent().await
}

#[actix_web::test]
async fn health_check_is_public() {
    let h = harness().await;
    let app = app!(h.state);

    let req = test::TestRequest::get()
        .uri("/api/v1/health-check")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn reactor_listing_second_page() {
    let h = harness().await;
    let user = seed_user(&h.state, "wanjiru@lab.io", Role::User).await;

    for i in 0..15 {
        let status = if i < 12 {
            ReactorStatus::Active
        } else {
            ReactorStatus::Inactive
        };
        h.state
            .reactors
            .create(NewReactor {
                name: format!("R-{i}"),
                status,
                pathway: None,
                pdf_url: None,
            })
            .await
            .unwrap();
    }

    let app = app!(h.state);
    let req = test::TestRequest::get()
        .uri("/api/v1/reactors?status=active&page=2&limit=5")
        .insert_header((header::AUTHORIZATION, bearer(&h.state, &user, TokenPurpose::Access)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    let pagination = &body["pagination"];
    assert_eq!(pagination["total"], 12);
    assert_eq!(pagination["total_pages"], 3);
    assert_eq!(pagination["has_next"], true);
    assert_eq!(pagination["has_previous"], true);
    assert_eq!(pagination["previous_page"], 1);
    assert_eq!(pagination["next_page"], 3);
}

#[actix_web::test]
async fn protected_routes_need_a_token() {
    let h = harness().await;
    let app = app!(h.state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/reactors").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "status_code": "authentication", "message": "authorization header is missing" })
    );
}

#[actix_web::test]
async fn huge_page_number_is_invalid() {
    let h = harness().await;
    let user = seed_user(&h.state, "kiprop@lab.io", Role::User).await;
    let app = app!(h.state);

    let req = test::TestRequest::get()
        .uri("/api/v1/reactors?page=18446744073709551615&limit=10")
        .insert_header((header::AUTHORIZATION, bearer(&h.state, &user, TokenPurpose::Access)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], "invalid");
}

#[actix_web::test]
async fn non_admin_cannot_change_roles() {
    let h = harness().await;
    let user = seed_user(&h.state, "otieno@lab.io", Role::User).await;
    let other = seed_user(&h.state, "njeri@lab.io", Role::User).await;
    let auth = bearer(&h.state, &user, TokenPurpose::Access);
    let app = app!(h.state);

    for target in [other.id, user.id] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/users/{target}"))
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .set_json(json!({ "role": "admin" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status_code"], "forbidden");
    }

    // Own profile without a role change is fine.
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/users/{}", user.id))
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({ "name": "Otieno O." }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], "user updated successfully");

    let stored = h.state.users.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Otieno O.");
    assert_eq!(stored.role, Role::User);
}

#[actix_web::test]
async fn admin_routes_reject_users() {
    let h = harness().await;
    let user = seed_user(&h.state, "kamau@lab.io", Role::User).await;
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/reactors")
        .insert_header((header::AUTHORIZATION, bearer(&h.state, &user, TokenPurpose::Access)))
        .set_json(json!({ "name": "R-9", "status": "active" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "status_code": "forbidden",
            "message": "access to the requested resource is forbidden"
        })
    );
}

#[actix_web::test]
async fn wrong_password_issues_no_tokens() {
    let h = harness().await;
    seed_user(&h.state, "akinyi@lab.io", Role::Admin).await;
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": "akinyi@lab.io", "password": "not-the-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], "authentication");
    assert_eq!(body["message"], "invalid email or password");
    assert!(body.get("access_token").is_none());
    assert!(body.get("refresh_token").is_none());

    let user = h.state.users.find_by_email("akinyi@lab.io").await.unwrap().unwrap();
    assert!(h.state.users.refresh_token(user.id).await.unwrap().is_none());
}

#[actix_web::test]
async fn unknown_email_and_bad_email_on_login() {
    let h = harness().await;
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": "ghost@lab.io", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "invalid email or password");

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": "ghost-at-lab.io", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "status_code": "invalid", "message": "invalid email address" })
    );
}

#[actix_web::test]
async fn login_refresh_and_logout() {
    let h = harness().await;
    seed_user(&h.state, "mutua@lab.io", Role::User).await;
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": "mutua@lab.io", "password": PASSWORD }))
        .to_request();
    let login: Value = test::call_and_read_body_json(&app, req).await;
    let access = login["access_token"].as_str().unwrap().to_string();
    let refresh = login["refresh_token"].as_str().unwrap().to_string();
    assert_eq!(login["user"]["email"], "mutua@lab.io");

    let req = test::TestRequest::post()
        .uri("/api/v1/refresh-token")
        .set_json(json!({ "refresh_token": refresh }))
        .to_request();
    let refreshed: Value = test::call_and_read_body_json(&app, req).await;
    assert!(refreshed["access_token"].is_string());
    assert!(refreshed["access_token_expires_at"].is_string());

    // An access token cannot stand in for a refresh token.
    let req = test::TestRequest::post()
        .uri("/api/v1/refresh-token")
        .set_json(json!({ "refresh_token": access }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/logout")
        .insert_header((header::AUTHORIZATION, format!("Bearer {access}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], "success");

    let req = test::TestRequest::post()
        .uri("/api/v1/refresh-token")
        .set_json(json!({ "refresh_token": refresh }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn reset_token_is_not_a_bearer_token() {
    let h = harness().await;
    let user = seed_user(&h.state, "chebet@lab.io", Role::Admin).await;
    let app = app!(h.state);

    let req = test::TestRequest::get()
        .uri("/api/v1/me")
        .insert_header((
            header::AUTHORIZATION,
            bearer(&h.state, &user, TokenPurpose::PasswordReset),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/me")
        .insert_header((header::AUTHORIZATION, bearer(&h.state, &user, TokenPurpose::Access)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["id"], user.id);
}

#[actix_web::test]
async fn password_reset_round_trip() {
    let h = harness().await;
    seed_user(&h.state, "wafula@lab.io", Role::User).await;
    let app = app!(h.state);

    // Unknown addresses get the same answer.
    for email in ["nobody@lab.io", "wafula@lab.io"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/request-password-reset")
            .set_json(json!({ "email": email }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], "password reset email sent");
    }

    let sent = wait_for_mail(&h.mailer).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "wafula@lab.io");

    let link_start = sent[0].html_body.find("token=").unwrap() + "token=".len();
    let token: String = sent[0].html_body[link_start..]
        .chars()
        .take_while(|c| *c != '"')
        .collect();

    let req = test::TestRequest::post()
        .uri("/api/v1/reset-password?token=garbage")
        .set_json(json!({ "password": "brand-new-pass" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/reset-password?token={token}"))
        .set_json(json!({ "password": "brand-new-pass" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], "password reset successful");

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": "wafula@lab.io", "password": "brand-new-pass" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn reset_password_requires_token() {
    let h = harness().await;
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/reset-password")
        .set_json(json!({ "password": "brand-new-pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "status_code": "invalid", "message": "token is required" }));
}

#[actix_web::test]
async fn device_stats_route_is_not_an_id() {
    let h = harness().await;
    let user = seed_user(&h.state, "ruto@lab.io", Role::User).await;
    let reactor = h
        .state
        .reactors
        .create(NewReactor {
            name: "R-1".into(),
            status: ReactorStatus::Active,
            pathway: None,
            pdf_url: None,
        })
        .await
        .unwrap();
    h.state
        .devices
        .create(NewDevice {
            name: "probe".into(),
            reactor_id: reactor.id,
            status: true,
        })
        .await
        .unwrap();
    let app = app!(h.state);

    let req = test::TestRequest::get()
        .uri("/api/v1/devices/stats")
        .insert_header((header::AUTHORIZATION, bearer(&h.state, &user, TokenPurpose::Access)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["totalDevices"], 1);
    assert_eq!(body["data"]["activeDevices"], 1);
}

#[actix_web::test]
async fn unknown_reactor_on_device_create_is_invalid() {
    let h = harness().await;
    let admin = seed_user(&h.state, "admin@lab.io", Role::Admin).await;
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/devices")
        .insert_header((header::AUTHORIZATION, bearer(&h.state, &admin, TokenPurpose::Access)))
        .set_json(json!({ "name": "probe", "reactorId": 404, "status": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_json_is_invalid() {
    let h = harness().await;
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"email\":")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], "invalid");
}

#[actix_web::test]
async fn readings_report_is_a_csv_attachment() {
    let h = harness().await;
    let user = seed_user(&h.state, "moraa@lab.io", Role::User).await;
    let reactor = h
        .state
        .reactors
        .create(NewReactor {
            name: "R-1".into(),
            status: ReactorStatus::Active,
            pathway: None,
            pdf_url: None,
        })
        .await
        .unwrap();
    let device = h
        .state
        .devices
        .create(NewDevice {
            name: "CO2 Probe".into(),
            reactor_id: reactor.id,
            status: true,
        })
        .await
        .unwrap();

    for (hour, co2) in [(8, 410.0), (9, 415.5), (23, 430.0)] {
        h.db.insert_reading_at(
            NewReading {
                device_id: device.id,
                payload: ReadingPayload {
                    co2: Some(co2),
                    ..Default::default()
                },
            },
            Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap(),
        )
        .await
        .unwrap();
    }

    let app = app!(h.state);
    let req = test::TestRequest::post()
        .uri("/api/v1/reports/readings")
        .insert_header((header::AUTHORIZATION, bearer(&h.state, &user, TokenPurpose::Access)))
        .set_json(json!({
            "deviceId": device.id,
            "start": "2024-06-01T08:00:00Z",
            "end": "2024-06-01T12:00:00Z"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("co2-probe-readings.csv"));

    let body = test::read_body(resp).await;
    let csv = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "timestamp,co2,humidity,temperature");
    assert_eq!(lines.len(), 3);
    assert!(lines[2].contains("415.5"));
}

#[actix_web::test]
async fn readings_listing_by_date() {
    let h = harness().await;
    let user = seed_user(&h.state, "nyambura@lab.io", Role::User).await;
    let reactor = h
        .state
        .reactors
        .create(NewReactor {
            name: "R-1".into(),
            status: ReactorStatus::Active,
            pathway: None,
            pdf_url: None,
        })
        .await
        .unwrap();
    let device = h
        .state
        .devices
        .create(NewDevice {
            name: "probe".into(),
            reactor_id: reactor.id,
            status: true,
        })
        .await
        .unwrap();

    for day in [1, 2] {
        h.db.insert_reading_at(
            NewReading {
                device_id: device.id,
                payload: ReadingPayload {
                    humidity: Some(55.0),
                    ..Default::default()
                },
            },
            Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
        )
        .await
        .unwrap();
    }

    let app = app!(h.state);
    let auth = bearer(&h.state, &user, TokenPurpose::Access);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/readings?device_id={}&date=2024-06-02", device.id))
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/readings?list_by=device")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
