//! # HTTP Server Module
//!
//! Axum-based REST surface. Each area of the API lives in its own route
//! module exposing a `*_routes(state)` constructor; `server` assembles
//! them into one router and owns startup.
//!
//! # Endpoints
//!
//! - `POST /login` - staff login
//! - `GET /api/profile` - staff profile lookup
//! - `POST /api/profile/picture` - profile picture upload (multipart)
//! - `PATCH /api/profile/password` - password change
//! - `GET /api/staff/timetables/today` - today's classes with live status
//! - `GET /api/staff/timetables/:staff_id` - full weekly timetable
//! - `POST /api/marks/save` - batched marks upsert
//! - `POST /api/attendance/save` - batched attendance upsert
//! - `POST /api/admin/students` - single student create
//! - `GET /health` - liveness

pub mod admin_routes;
pub mod attendance_routes;
pub mod auth_routes;
pub mod extract;
pub mod marks_routes;
pub mod profile_routes;
pub mod server;
pub mod timetable_routes;

pub use server::AppState;
