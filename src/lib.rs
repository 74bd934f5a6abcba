//! campusd - a small campus-management REST backend
//!
//! Staff authentication, profile management, timetable lookup, marks entry
//! and attendance recording over a relational database.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod file_storage;
pub mod http_server;
pub mod observability;
