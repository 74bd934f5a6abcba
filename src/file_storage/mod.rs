//! # Upload Storage
//!
//! Capability interface for storing uploaded files and returning a
//! reference path. Handlers never touch the filesystem directly.

pub mod local;

use thiserror::Error;

pub use local::LocalUploadStore;

/// Result type for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

/// Errors from the upload store
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store an uploaded file, return its public reference path
pub trait UploadStore: Send + Sync + std::fmt::Debug {
    /// `field` is the form field name, `original_name` the client-supplied
    /// filename (used only for its extension).
    fn store(&self, field: &str, original_name: &str, data: &[u8]) -> UploadResult<String>;
}
