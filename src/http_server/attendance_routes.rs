//! Attendance HTTP Routes
//!
//! Batched attendance recording, keyed by (registration number, date,
//! period). Resubmitting a period overwrites status and reason.

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

/// Upsert target for attendance, keyed by the composite period key
pub const ATTENDANCE_UPSERT: TableSpec = TableSpec {
    table: "attendance",
    columns: &["reg_no", "date", "period", "staff_id", "status", "reason"],
    key_columns: &["reg_no", "date", "period"],
    update_columns: &["staff_id", "status", "reason"],
};

/// Accepted attendance statuses, mirrored by the table's CHECK constraint
pub const ALLOWED_STATUSES: &[&str] = &["Present", "Absent", "On Duty"];

/// Attendance routes with shared state
pub fn attendance_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/attendance/save", post(save_attendance_handler))
        .with_state(state)
}

// ==================
// Request Types
// ==================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAttendanceRequest {
    pub attendance_data: Vec<AttendanceEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub reg_no: String,
    pub date: String,
    pub period: i64,
    pub staff_id: i64,
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

// ==================
// Handlers
// ==================

async fn save_attendance_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<SaveAttendanceRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if request.attendance_data.is_empty() {
        return Err(ApiError::Validation(
            "attendanceData must be a non-empty array.".to_string(),
        ));
    }
    for entry in &request.attendance_data {
        if entry.reg_no.trim().is_empty() || entry.date.trim().is_empty() {
            return Err(ApiError::Validation(
                "Each attendance entry needs a registration number and date.".to_string(),
            ));
        }
        if !ALLOWED_STATUSES.contains(&entry.status.as_str()) {
            return Err(ApiError::Validation(format!(
                "Invalid attendance status '{}'.",
                entry.status
            )));
        }
    }

    let rows: Vec<Vec<SqlValue>> = request
        .attendance_data
        .iter()
        .map(|entry| {
            vec![
                SqlValue::Text(entry.reg_no.trim().to_string()),
                SqlValue::Text(entry.date.trim().to_string()),
                SqlValue::Integer(entry.period),
                SqlValue::Integer(entry.staff_id),
                SqlValue::Text(entry.status.clone()),
                match &entry.reason {
                    Some(reason) if !reason.trim().is_empty() => {
                        SqlValue::Text(reason.trim().to_string())
                    }
                    _ => SqlValue::Null,
                },
            ]
        })
        .collect();

    let saved = state
        .db
        .upsert_batch(&ATTENDANCE_UPSERT, &rows)
        .await
        .map_err(|e| {
            Logger::error(
                "attendance_save_failed",
                &[
                    ("records", &rows.len().to_string()),
                    ("error", &e.to_string()),
                ],
            );
            ApiError::from(e)
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "Attendance saved successfully.",
        "saved": saved,
    })))
}
