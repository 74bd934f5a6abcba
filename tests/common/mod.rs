//! Shared test utilities.
//!
//! Each test gets its own scratch directory holding a fresh SQLite
//! database and upload root; the router under test is the real one.

// Allow dead_code because helpers are used across different test files,
// and each test binary is analyzed independently.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;

use campusd::auth::{hash_password, PasswordPolicy};
use campusd::config::Config;
use campusd::db::Database;
use campusd::file_storage::LocalUploadStore;
use campusd::http_server::server::{build_router, AppState};

pub struct TestApp {
    pub db: Database,
    pub state: Arc<AppState>,
    pub config: Config,
    _scratch: TempDir,
}

impl TestApp {
    /// Fresh router over the shared state; the right pattern for oneshot
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), &self.config)
    }
}

/// Create a test app over a scratch database
pub async fn setup() -> TestApp {
    let scratch = TempDir::new().unwrap();
    let db_path = scratch.path().join("campusd.sqlite3");
    let config = Config {
        database_url: format!("sqlite://{}", db_path.display()),
        ..Default::default()
    };

    let db = Database::connect(&config).await.unwrap();
    db.migrate().await.unwrap();

    let uploads = Arc::new(LocalUploadStore::new(
        scratch.path().join("uploads"),
        "/uploads",
    ));
    let state = Arc::new(AppState {
        db: db.clone(),
        uploads,
        password_policy: PasswordPolicy::default(),
    });

    TestApp {
        db,
        state,
        config,
        _scratch: scratch,
    }
}

/// Make a JSON request and return status + parsed JSON response
pub async fn request_json(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = if bytes.is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::json!({ "raw_body": String::from_utf8_lossy(&bytes).to_string() })
        })
    };
    (status, json)
}

pub async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    request_json(app, "POST", uri, body).await
}

pub async fn patch_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    request_json(app, "PATCH", uri, body).await
}

/// POST a raw body with a JSON content type, for malformed-payload cases.
/// The response body must parse as JSON.
pub async fn post_raw(
    app: axum::Router,
    uri: &str,
    body: &str,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

/// Make a GET request and return status + parsed JSON response
pub async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::json!({}));
    (status, json)
}

// ==================
// Seeding helpers
// ==================

pub async fn seed_user(db: &Database, name: &str, email: &str, password: &str) {
    let hash = hash_password(password).unwrap();
    sqlx::query("INSERT INTO users (name, email, password, role) VALUES (?, ?, ?, 'staff')")
        .bind(name)
        .bind(email)
        .bind(&hash)
        .execute(db.pool())
        .await
        .unwrap();
}

pub async fn seed_staff(db: &Database, name: &str, email: &str, department: &str) -> i64 {
    let result = sqlx::query("INSERT INTO staff (name, email, department) VALUES (?, ?, ?)")
        .bind(name)
        .bind(email)
        .bind(department)
        .execute(db.pool())
        .await
        .unwrap();
    result.last_insert_rowid()
}

pub async fn seed_timetable(
    db: &Database,
    staff_id: i64,
    day_of_week: &str,
    period_number: i64,
    start_time: &str,
    end_time: &str,
    subject: &str,
) {
    sqlx::query(
        "INSERT INTO timetables (staff_id, day_of_week, period_number, start_time, end_time, \
         subject, year, section, department) VALUES (?, ?, ?, ?, ?, ?, 'III', 'A', 'CSE')",
    )
    .bind(staff_id)
    .bind(day_of_week)
    .bind(period_number)
    .bind(start_time)
    .bind(end_time)
    .bind(subject)
    .execute(db.pool())
    .await
    .unwrap();
}

pub async fn count_rows(db: &Database, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .unwrap()
}
