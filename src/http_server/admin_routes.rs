//! Admin HTTP Routes
//!
//! Student creation. Unlike the batched save endpoints, creating an entity
//! rejects duplicates instead of overwriting them; the asymmetry is
//! intentional ("create new" vs "submit periodic data").

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::db::{DbError, SqlValue, TableSpec};
use crate::error::{ApiError, ApiResult};
use crate::observability::Logger;

use super::extract::JsonBody;
use super::server::AppState;

/// Insert target for the student roster
pub const STUDENTS_INSERT: TableSpec = TableSpec {
    table: "students",
    columns: &["reg_no", "name", "year", "section", "department"],
    key_columns: &["reg_no"],
    update_columns: &[],
};

/// Admin routes with shared state
pub fn admin_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/admin/students", post(create_student_handler))
        .with_state(state)
}

// ==================
// Request Types
// ==================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    #[serde(default)]
    pub reg_no: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

// ==================
// Handlers
// ==================

async fn create_student_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreateStudentRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let reg_no = required(&request.reg_no)?;
    let name = required(&request.name)?;
    let year = required(&request.year)?;
    let section = required(&request.section)?;
    let department = required(&request.department)?;

    let row = vec![
        SqlValue::Text(reg_no.to_string()),
        SqlValue::Text(name.to_string()),
        SqlValue::Text(year.to_string()),
        SqlValue::Text(section.to_string()),
        SqlValue::Text(department.to_string()),
    ];

    let student_id = state
        .db
        .insert_one(&STUDENTS_INSERT, &row)
        .await
        .map_err(|e| match e {
            DbError::Duplicate => ApiError::Duplicate(
                "A student with this registration number already exists.".to_string(),
            ),
            other => {
                Logger::error(
                    "student_create_failed",
                    &[("reg_no", reg_no), ("error", &other.to_string())],
                );
                ApiError::from(other)
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Student created successfully.",
            "studentId": student_id,
        })),
    ))
}

fn required(value: &Option<String>) -> ApiResult<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("All student fields are required.".to_string()))
}
