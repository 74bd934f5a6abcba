//! # Local Filesystem Upload Store
//!
//! Files are written under a root directory with a collision-resistant
//! name: `<field>-<millis><ext>`, the original filename contributing only
//! its extension. The returned reference path is `<public_base>/<name>`.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use super::{UploadResult, UploadStore};

/// Upload store backed by a local directory
#[derive(Debug)]
pub struct LocalUploadStore {
    root: PathBuf,
    public_base: String,
}

impl LocalUploadStore {
    /// `root` is where files land on disk; `public_base` is the URL prefix
    /// they are served under (e.g. "/uploads").
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    fn extension_of(original_name: &str) -> &str {
        match original_name.rfind('.') {
            Some(idx) if idx + 1 < original_name.len() => &original_name[idx..],
            _ => "",
        }
    }
}

impl UploadStore for LocalUploadStore {
    fn store(&self, field: &str, original_name: &str, data: &[u8]) -> UploadResult<String> {
        fs::create_dir_all(&self.root)?;

        let ext = Self::extension_of(original_name);
        let file_name = format!("{}-{}{}", field, Utc::now().timestamp_millis(), ext);
        fs::write(self.root.join(&file_name), data)?;

        Ok(format!("{}/{}", self.public_base, file_name))
    }
}
