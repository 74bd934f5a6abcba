//! # Observability
//!
//! Structured logging for request handlers and the persistence layer.

pub mod logger;

pub use logger::{Logger, Severity};
