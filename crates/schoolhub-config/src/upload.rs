use std::env;
use std::path::PathBuf;

use crate::env_parse;

/// Profile image storage on the local file system.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Directory images are written to.
    pub root_dir: PathBuf,
    /// URL prefix under which `root_dir` is served.
    pub public_path: String,
    pub max_bytes: usize,
    pub allowed_mime_types: Vec<String>,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            root_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.root_dir),
            public_path: env::var("UPLOAD_PUBLIC_PATH").unwrap_or(defaults.public_path),
            max_bytes: env_parse("UPLOAD_MAX_BYTES", defaults.max_bytes),
            allowed_mime_types: defaults.allowed_mime_types,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./uploads"),
            public_path: "/uploads".to_string(),
            max_bytes: 5 * 1024 * 1024,
            allowed_mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
            ],
        }
    }
}
