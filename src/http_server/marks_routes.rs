//! Marks HTTP Routes
//!
//! Batched marks entry. A submission is applied atomically through the
//! batch upsert engine: resubmitting for an existing registration number
//! overwrites all score fields (last write wins), and one bad record
//! aborts the whole batch.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::db::{SqlValue, TableSpec};
use crate::error::{ApiError, ApiResult};
use crate::observability::Logger;

use super::extract::JsonBody;
use super::server::AppState;

/// Upsert target for marks, keyed by registration number
pub const MARKS_UPSERT: TableSpec = TableSpec {
    table: "marks",
    columns: &[
        "reg_no",
        "student_name",
        "year",
        "section",
        "department",
        "test1",
        "test2",
        "test3",
        "total",
    ],
    key_columns: &["reg_no"],
    update_columns: &[
        "student_name",
        "year",
        "section",
        "department",
        "test1",
        "test2",
        "test3",
        "total",
    ],
};

/// Marks routes with shared state
pub fn marks_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/marks/save", post(save_marks_handler))
        .with_state(state)
}

// ==================
// Request Types
// ==================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMarksRequest {
    pub marks_data: Vec<MarkEntry>,
    pub year: String,
    pub section: String,
    pub department: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkEntry {
    pub reg_no: String,
    pub student_name: String,
    pub test1: f64,
    pub test2: f64,
    pub test3: f64,
}

// ==================
// Handlers
// ==================

async fn save_marks_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<SaveMarksRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if request.marks_data.is_empty() {
        return Err(ApiError::Validation(
            "marksData must be a non-empty array.".to_string(),
        ));
    }
    for entry in &request.marks_data {
        if entry.reg_no.trim().is_empty() {
            return Err(ApiError::Validation(
                "Each marks entry needs a registration number.".to_string(),
            ));
        }
    }

    let rows: Vec<Vec<SqlValue>> = request
        .marks_data
        .iter()
        .map(|entry| {
            let total = entry.test1 + entry.test2 + entry.test3;
            vec![
                SqlValue::Text(entry.reg_no.trim().to_string()),
                SqlValue::Text(entry.student_name.clone()),
                SqlValue::Text(request.year.clone()),
                SqlValue::Text(request.section.clone()),
                SqlValue::Text(request.department.clone()),
                SqlValue::Real(entry.test1),
                SqlValue::Real(entry.test2),
                SqlValue::Real(entry.test3),
                SqlValue::Real(total),
            ]
        })
        .collect();

    let saved = state
        .db
        .upsert_batch(&MARKS_UPSERT, &rows)
        .await
        .map_err(|e| {
            Logger::error(
                "marks_save_failed",
                &[
                    ("records", &rows.len().to_string()),
                    ("year", &request.year),
                    ("section", &request.section),
                    ("department", &request.department),
                    ("error", &e.to_string()),
                ],
            );
            ApiError::from(e)
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "Marks saved successfully.",
        "saved": saved,
    })))
}
