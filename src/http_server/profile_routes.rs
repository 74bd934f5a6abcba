//! Profile HTTP Routes
//!
//! Staff profile lookup, profile picture upload, and password change.

use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::hash_password;
use crate::error::{ApiError, ApiResult};
use crate::observability::Logger;

use super::extract::JsonBody;
use super::server::AppState;

/// Profile routes with shared state
pub fn profile_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/profile", get(get_profile_handler))
        .route("/api/profile/picture", post(upload_picture_handler))
        .route("/api/profile/password", patch(change_password_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
struct StaffRow {
    id: i64,
    name: String,
    email: String,
    department: Option<String>,
    profile_picture_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

// ==================
// Handlers
// ==================

async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let email = query
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Email query parameter is required.".to_string()))?;

    let row = state
        .db
        .with_timeout(
            sqlx::query_as::<_, StaffRow>(
                "SELECT id, name, email, department, profile_picture_url \
                 FROM staff WHERE email = ?",
            )
            .bind(email)
            .fetch_optional(state.db.pool()),
        )
        .await
        .map_err(|e| {
            Logger::error(
                "profile_query_failed",
                &[("email", email), ("error", &e.to_string())],
            );
            ApiError::from(e)
        })?;

    let Some(profile) = row else {
        return Err(ApiError::NotFound("Staff profile not found.".to_string()));
    };

    Ok(Json(json!({ "success": true, "profile": profile })))
}

async fn upload_picture_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let mut email: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("Malformed multipart payload.".to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "email" {
            let value = field
                .text()
                .await
                .map_err(|_| ApiError::Validation("Malformed multipart payload.".to_string()))?;
            email = Some(value);
        } else if name == "profilePicture" {
            let original = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::Validation("Malformed multipart payload.".to_string()))?;
            file = Some((original, data.to_vec()));
        }
    }

    let email = email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Validation("Email field is required.".to_string()))?;
    let (original_name, data) = file
        .ok_or_else(|| ApiError::Validation("profilePicture file is required.".to_string()))?;

    let file_path = state
        .uploads
        .store("profilePicture", &original_name, &data)
        .map_err(|e| {
            Logger::error(
                "picture_store_failed",
                &[("email", &email), ("error", &e.to_string())],
            );
            ApiError::Persistence
        })?;

    let result = state
        .db
        .with_timeout(
            sqlx::query("UPDATE staff SET profile_picture_url = ? WHERE email = ?")
                .bind(&file_path)
                .bind(&email)
                .execute(state.db.pool()),
        )
        .await
        .map_err(|e| {
            Logger::error(
                "picture_update_failed",
                &[("email", &email), ("error", &e.to_string())],
            );
            ApiError::from(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Staff profile not found.".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Profile picture updated.",
        "filePath": file_path,
    })))
}

async fn change_password_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<ChangePasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Email and password are required.".to_string()))?;
    let password = request
        .password
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Email and password are required.".to_string()))?;

    state.password_policy.validate(password)?;
    let hash = hash_password(password)?;

    let result = state
        .db
        .with_timeout(
            sqlx::query("UPDATE users SET password = ? WHERE email = ?")
                .bind(&hash)
                .bind(email)
                .execute(state.db.pool()),
        )
        .await
        .map_err(|e| {
            Logger::error(
                "password_update_failed",
                &[("email", email), ("error", &e.to_string())],
            );
            ApiError::from(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(
            "No account found with that email.".to_string(),
        ));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Password updated successfully.",
    })))
}
