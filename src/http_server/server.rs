//! # HTTP Server
//!
//! Router assembly and process startup. The database handle and upload
//! store are constructed here once and injected into every route module
//! through shared state; nothing else in the process holds mutable state.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::PasswordPolicy;
use crate::config::Config;
use crate::db::Database;
use crate::file_storage::{LocalUploadStore, UploadStore};
use crate::observability::Logger;

use super::admin_routes::admin_routes;
use super::attendance_routes::attendance_routes;
use super::auth_routes::auth_routes;
use super::marks_routes::marks_routes;
use super::profile_routes::profile_routes;
use super::timetable_routes::timetable_routes;

/// State shared by all request handlers
pub struct AppState {
    pub db: Database,
    pub uploads: Arc<dyn UploadStore>,
    pub password_policy: PasswordPolicy,
}

/// Build the combined router with all endpoints
pub fn build_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_origins.is_empty() {
        // No origins configured: permissive, for development
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(health_handler))
        .merge(auth_routes(state.clone()))
        .merge(profile_routes(state.clone()))
        .merge(timetable_routes(state.clone()))
        .merge(marks_routes(state.clone()))
        .merge(attendance_routes(state.clone()))
        .merge(admin_routes(state))
        .layer(cors)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "campusd" }))
}

/// Load config, open the database, and serve until the process exits
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    let db = Database::connect(&config).await?;
    db.migrate().await?;
    Logger::info("database_ready", &[("url", &config.database_url)]);

    let uploads: Arc<dyn UploadStore> =
        Arc::new(LocalUploadStore::new(config.upload_dir.as_str(), "/uploads"));

    let state = Arc::new(AppState {
        db: db.clone(),
        uploads,
        password_policy: PasswordPolicy::default(),
    });

    let router = build_router(state, &config);

    let addr: SocketAddr = config.socket_addr().parse()?;
    Logger::info("server_listening", &[("addr", &config.socket_addr())]);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    db.close().await;
    Ok(())
}
