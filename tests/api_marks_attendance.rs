//! End-to-end coverage of the batched save endpoints over HTTP.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{count_rows, post_json, post_raw, setup};

#[tokio::test]
async fn save_marks_persists_batch_with_computed_totals() {
    let app = setup().await;

    let (status, body) = post_json(
        app.router(),
        "/api/marks/save",
        json!({
            "marksData": [
                { "regNo": "21CS001", "studentName": "Anu", "test1": 40, "test2": 45, "test3": 48 },
                { "regNo": "21CS002", "studentName": "Bala", "test1": 30, "test2": 35, "test3": 33 }
            ],
            "year": "III",
            "section": "A",
            "department": "CSE"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["saved"], 2);

    let total: f64 =
        sqlx::query_scalar("SELECT total FROM marks WHERE reg_no = '21CS001'")
            .fetch_one(app.db.pool())
            .await
            .unwrap();
    assert_eq!(total, 133.0);
}

#[tokio::test]
async fn save_marks_resubmission_overwrites() {
    let app = setup().await;

    let submit = |t1: f64, t2: f64, t3: f64| {
        json!({
            "marksData": [
                { "regNo": "21CS001", "studentName": "Anu", "test1": t1, "test2": t2, "test3": t3 }
            ],
            "year": "III", "section": "A", "department": "CSE"
        })
    };

    let (status, _) = post_json(app.router(), "/api/marks/save", submit(10.0, 20.0, 30.0)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post_json(app.router(), "/api/marks/save", submit(41.0, 42.0, 43.0)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(count_rows(&app.db, "marks").await, 1);
    let (t1, total): (f64, f64) =
        sqlx::query_as("SELECT test1, total FROM marks WHERE reg_no = '21CS001'")
            .fetch_one(app.db.pool())
            .await
            .unwrap();
    assert_eq!((t1, total), (41.0, 126.0));
}

#[tokio::test]
async fn save_marks_rejects_empty_batch() {
    let app = setup().await;

    let (status, body) = post_json(
        app.router(),
        "/api/marks/save",
        json!({ "marksData": [], "year": "III", "section": "A", "department": "CSE" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(count_rows(&app.db, "marks").await, 0);
}

#[tokio::test]
async fn save_marks_rejects_blank_reg_no_before_persisting_anything() {
    let app = setup().await;

    let (status, body) = post_json(
        app.router(),
        "/api/marks/save",
        json!({
            "marksData": [
                { "regNo": "21CS001", "studentName": "Anu", "test1": 1, "test2": 2, "test3": 3 },
                { "regNo": "  ", "studentName": "Ghost", "test1": 1, "test2": 2, "test3": 3 }
            ],
            "year": "III", "section": "A", "department": "CSE"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(count_rows(&app.db, "marks").await, 0);
}

#[tokio::test]
async fn save_marks_malformed_body_gets_the_standard_error_shape() {
    let app = setup().await;

    let (status, body) = post_raw(app.router(), "/api/marks/save", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("valid JSON"));
    // The serde parse error must not leak into the response
    assert!(!message.contains("line 1"));
    assert_eq!(count_rows(&app.db, "marks").await, 0);
}

#[tokio::test]
async fn save_attendance_persists_and_overwrites_on_resubmission() {
    let app = setup().await;

    let (status, body) = post_json(
        app.router(),
        "/api/attendance/save",
        json!({
            "attendanceData": [
                { "regNo": "21CS001", "date": "2024-03-11", "period": 1, "staffId": 7,
                  "status": "Absent", "reason": "Medical leave" },
                { "regNo": "21CS002", "date": "2024-03-11", "period": 1, "staffId": 7,
                  "status": "Present" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["saved"], 2);

    // Same composite key, new status: overwritten, not duplicated
    let (status, _) = post_json(
        app.router(),
        "/api/attendance/save",
        json!({
            "attendanceData": [
                { "regNo": "21CS001", "date": "2024-03-11", "period": 1, "staffId": 7,
                  "status": "Present" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(count_rows(&app.db, "attendance").await, 2);
    let (db_status, reason): (String, Option<String>) = sqlx::query_as(
        "SELECT status, reason FROM attendance WHERE reg_no = '21CS001' AND date = '2024-03-11' AND period = 1",
    )
    .fetch_one(app.db.pool())
    .await
    .unwrap();
    assert_eq!(db_status, "Present");
    assert_eq!(reason, None);
}

#[tokio::test]
async fn save_attendance_same_key_different_period_stays_distinct() {
    let app = setup().await;

    let (status, _) = post_json(
        app.router(),
        "/api/attendance/save",
        json!({
            "attendanceData": [
                { "regNo": "21CS001", "date": "2024-03-11", "period": 1, "staffId": 7, "status": "Present" },
                { "regNo": "21CS001", "date": "2024-03-11", "period": 2, "staffId": 7, "status": "Absent" }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(count_rows(&app.db, "attendance").await, 2);
}

#[tokio::test]
async fn save_attendance_rejects_unknown_status() {
    let app = setup().await;

    let (status, body) = post_json(
        app.router(),
        "/api/attendance/save",
        json!({
            "attendanceData": [
                { "regNo": "21CS001", "date": "2024-03-11", "period": 1, "staffId": 7, "status": "Sleeping" }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("Sleeping"));
    assert_eq!(count_rows(&app.db, "attendance").await, 0);
}

#[tokio::test]
async fn save_attendance_rejects_empty_batch() {
    let app = setup().await;

    let (status, body) =
        post_json(app.router(), "/api/attendance/save", json!({ "attendanceData": [] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
