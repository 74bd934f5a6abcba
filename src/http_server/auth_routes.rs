//! Auth HTTP Routes
//!
//! Staff login. A successful login returns the joined user/staff profile;
//! there is no token or session layer.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::auth::verify_password;
use crate::error::{ApiError, ApiResult};
use crate::observability::Logger;

use super::extract::JsonBody;
use super::server::AppState;

/// Auth routes with shared state
pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct LoginRow {
    name: String,
    email: String,
    password: String,
    role: String,
    staff_id: Option<i64>,
    profile_picture_url: Option<String>,
    department: Option<String>,
}

const LOGIN_SQL: &str = "SELECT u.name, u.email, u.password, u.role, \
     s.id AS staff_id, s.profile_picture_url, s.department \
     FROM users u LEFT JOIN staff s ON u.email = s.email \
     WHERE u.email = ?";

// ==================
// Handlers
// ==================

async fn login_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let email = required_field(request.email.as_deref())?;
    let password = required_field(request.password.as_deref())?;

    let row = state
        .db
        .with_timeout(
            sqlx::query_as::<_, LoginRow>(LOGIN_SQL)
                .bind(email)
                .fetch_optional(state.db.pool()),
        )
        .await
        .map_err(|e| {
            Logger::error(
                "login_query_failed",
                &[("email", email), ("error", &e.to_string())],
            );
            ApiError::from(e)
        })?;

    let Some(user) = row else {
        return Err(ApiError::Auth(
            "Invalid credentials. User not found.".to_string(),
        ));
    };

    if !verify_password(password, &user.password) {
        return Err(ApiError::Auth(
            "Invalid credentials. Incorrect password.".to_string(),
        ));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Login successful!",
        "user": {
            "id": user.staff_id,
            "name": user.name,
            "email": user.email,
            "role": user.role,
            "department": user.department,
            "profile_picture_url": user.profile_picture_url,
        }
    })))
}

fn required_field(value: Option<&str>) -> ApiResult<&str> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Email and password are required.".to_string()))
}
