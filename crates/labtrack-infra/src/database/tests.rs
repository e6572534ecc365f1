use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Value};

use labtrack_core::domain::{ReactorStatus, Role};
use labtrack_core::error::RepoError;
use labtrack_core::filter::{ReactorFilter, UserFilter};
use labtrack_core::pagination::PageRequest;
use labtrack_core::ports::{ReactorRepository, ReadingRepository, UserRepository};

use crate::database::entity::{reactor, reading, user};
use crate::database::postgres_base::repo_err;
use crate::database::postgres_repo::{
    PostgresReactorRepository, PostgresReadingRepository, PostgresUserRepository,
};

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

fn user_model(id: i64, role: &str) -> user::Model {
    user::Model {
        id,
        name: "Wanjiru".to_owned(),
        email: "wanjiru@lab.io".to_owned(),
        phone_number: None,
        role: role.to_owned(),
        is_active: true,
        password_hash: "$argon2id$stub".to_owned(),
        refresh_token: None,
        created_at: Utc::now().into(),
    }
}

fn reactor_model(id: i64, name: &str) -> reactor::Model {
    reactor::Model {
        id,
        name: name.to_owned(),
        status: "active".to_owned(),
        pathway: Some("mineralisation".to_owned()),
        pdf_url: None,
        deleted_at: None,
        created_at: Utc::now().into(),
    }
}

/// The `WHERE ...` fragment of a statement, up to its `ORDER BY`.
fn where_clause(sql: &str) -> &str {
    let start = sql.find("WHERE").expect("statement has a WHERE clause");
    let end = sql[start..]
        .find(" ORDER BY")
        .map(|i| start + i)
        .unwrap_or(sql.len());
    &sql[start..end]
}

#[tokio::test]
async fn test_find_user_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(7, "admin")]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user = repo.find_by_id(7).await.unwrap().unwrap();

    assert_eq!(user.id, 7);
    assert_eq!(user.role, Role::Admin);
}

#[tokio::test]
async fn test_unknown_role_is_a_query_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(7, "superuser")]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let err = repo.find_by_id(7).await.unwrap_err();

    assert!(matches!(err, RepoError::Query(_)));
}

#[tokio::test]
async fn test_credentials_carry_the_hash() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(3, "user")]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let creds = repo.find_credentials("wanjiru@lab.io").await.unwrap().unwrap();

    assert_eq!(creds.password_hash, "$argon2id$stub");
    assert_eq!(creds.user.email, "wanjiru@lab.io");
}

#[tokio::test]
async fn test_reactor_list_and_count_share_predicates() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![reactor_model(12, "Kiln B"), reactor_model(11, "Kiln A")]])
        .append_query_results([vec![count_row(12)]])
        .into_connection();

    let repo = PostgresReactorRepository::new(db);
    let mut filter = ReactorFilter::new(PageRequest::new(2, 5).unwrap(), Some("Kiln".into()));
    filter.status = Some(ReactorStatus::Active);

    let page = repo.list(&filter).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.pagination.total, 12);
    assert_eq!(page.pagination.total_pages, 3);
    assert!(page.pagination.has_next);
    assert!(page.pagination.has_previous);

    let log = repo.db.into_transaction_log();
    assert_eq!(log.len(), 2);

    let list_sql = &log[0].statements()[0].sql;
    let count_sql = &log[1].statements()[0].sql;
    let predicates = where_clause(list_sql);

    assert!(predicates.contains("\"deleted_at\" IS NULL"));
    assert!(predicates.contains("LOWER"));
    assert!(count_sql.contains("COUNT"));
    assert!(count_sql.contains(predicates));
}

#[tokio::test]
async fn test_user_list_filters_reach_count() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .append_query_results([vec![count_row(0)]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let mut filter = UserFilter::new(PageRequest::default(), None);
    filter.is_active = Some(false);
    filter.role = Some(Role::User);

    let page = repo.list(&filter).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.pagination.total_pages, 0);

    let log = repo.db.into_transaction_log();
    let predicates = where_clause(&log[0].statements()[0].sql).to_owned();
    assert!(predicates.contains("\"is_active\""));
    assert!(predicates.contains("\"role\""));
    assert!(log[1].statements()[0].sql.contains(&predicates));
}

#[tokio::test]
async fn test_soft_delete_of_missing_reactor() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresReactorRepository::new(db);
    let err = repo.delete(42).await.unwrap_err();

    assert!(matches!(err, RepoError::NotFound(msg) if msg == "reactor with id 42 not found"));
}

#[tokio::test]
async fn test_readings_by_date_decode_payload() {
    let ts = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![reading::Model {
            id: 1,
            device_id: 4,
            payload: serde_json::json!({ "co2": 412.5, "humidity": null, "temperature": 21.0 }),
            timestamp: ts.into(),
        }]])
        .into_connection();

    let repo = PostgresReadingRepository::new(db);
    let readings = repo
        .list_by_date(4, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        .await
        .unwrap();

    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].payload.co2, Some(412.5));
    assert_eq!(readings[0].payload.humidity, None);
    assert_eq!(readings[0].timestamp, ts);

    let log = repo.db.into_transaction_log();
    let sql = &log[0].statements()[0].sql;
    assert!(sql.contains(">="));
    assert!(sql.contains("ORDER BY \"readings\".\"timestamp\" ASC"));
}

#[test]
fn test_repo_err_classification() {
    assert!(matches!(
        repo_err(DbErr::RecordNotFound("gone".into())),
        RepoError::NotFound(_)
    ));
    assert!(matches!(
        repo_err(DbErr::Custom("boom".into())),
        RepoError::Query(_)
    ));
}
