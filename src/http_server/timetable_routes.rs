//! Timetable HTTP Routes
//!
//! Timetable lookup for staff. The today view annotates each row with a
//! live status derived from the current wall-clock time; the weekly view
//! orders rows by a fixed Monday..Sunday weekday ordering, then start time.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Local, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::observability::Logger;

use super::server::AppState;

/// Timetable routes with shared state
pub fn timetable_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/staff/timetables/today", get(today_handler))
        .route("/api/staff/timetables/:staff_id", get(by_staff_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct TodayQuery {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
struct TimetableRow {
    id: i64,
    staff_id: i64,
    day_of_week: String,
    period_number: i64,
    start_time: String,
    end_time: String,
    subject: String,
    year: String,
    section: String,
    department: String,
}

/// Where a class sits relative to the current time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassStatus {
    Completed,
    Ongoing,
    Upcoming,
}

impl ClassStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassStatus::Completed => "Completed",
            ClassStatus::Ongoing => "Ongoing",
            ClassStatus::Upcoming => "Upcoming",
        }
    }
}

/// Classify a class against the current time of day. The start boundary is
/// inclusive, the end boundary exclusive: at exactly `start` the class is
/// Ongoing, at exactly `end` it is Completed.
pub fn derive_status(now: NaiveTime, start: NaiveTime, end: NaiveTime) -> ClassStatus {
    if now >= end {
        ClassStatus::Completed
    } else if now >= start {
        ClassStatus::Ongoing
    } else {
        ClassStatus::Upcoming
    }
}

/// Parse a stored clock value ("HH:MM" or "HH:MM:SS")
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

// ==================
// Handlers
// ==================

async fn today_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TodayQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let email = query
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Email query parameter is required.".to_string()))?;

    // One clock read: a request straddling midnight must not pair
    // yesterday's weekday with today's time of day
    let instant = Local::now();
    let today = instant.format("%A").to_string();
    let now = instant.time();

    let rows = state
        .db
        .with_timeout(
            sqlx::query_as::<_, TimetableRow>(
                "SELECT t.id, t.staff_id, t.day_of_week, t.period_number, t.start_time, \
                        t.end_time, t.subject, t.year, t.section, t.department \
                 FROM timetables t JOIN staff s ON s.id = t.staff_id \
                 WHERE s.email = ? AND t.day_of_week = ? \
                 ORDER BY t.start_time",
            )
            .bind(email)
            .bind(&today)
            .fetch_all(state.db.pool()),
        )
        .await
        .map_err(|e| {
            Logger::error(
                "timetable_today_query_failed",
                &[("email", email), ("error", &e.to_string())],
            );
            ApiError::from(e)
        })?;

    let mut annotated = Vec::with_capacity(rows.len());
    for row in &rows {
        let status = match (parse_clock(&row.start_time), parse_clock(&row.end_time)) {
            (Some(start), Some(end)) => derive_status(now, start, end),
            // Unparseable stored times are treated as not yet started
            _ => ClassStatus::Upcoming,
        };
        let mut value = serde_json::to_value(row).map_err(|_| ApiError::Persistence)?;
        value["status"] = json!(status.as_str());
        annotated.push(value);
    }

    Ok(Json(json!({
        "success": true,
        "todayTimetable": annotated,
    })))
}

async fn by_staff_handler(
    State(state): State<Arc<AppState>>,
    Path(staff_id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let rows = state
        .db
        .with_timeout(
            sqlx::query_as::<_, TimetableRow>(
                "SELECT id, staff_id, day_of_week, period_number, start_time, end_time, \
                        subject, year, section, department \
                 FROM timetables WHERE staff_id = ? \
                 ORDER BY CASE day_of_week \
                    WHEN 'Monday' THEN 1 \
                    WHEN 'Tuesday' THEN 2 \
                    WHEN 'Wednesday' THEN 3 \
                    WHEN 'Thursday' THEN 4 \
                    WHEN 'Friday' THEN 5 \
                    WHEN 'Saturday' THEN 6 \
                    WHEN 'Sunday' THEN 7 \
                    ELSE 8 END, start_time",
            )
            .bind(staff_id)
            .fetch_all(state.db.pool()),
        )
        .await
        .map_err(|e| {
            Logger::error(
                "timetable_query_failed",
                &[
                    ("staff_id", &staff_id.to_string()),
                    ("error", &e.to_string()),
                ],
            );
            ApiError::from(e)
        })?;

    Ok(Json(json!({
        "success": true,
        "timetables": rows,
    })))
}
