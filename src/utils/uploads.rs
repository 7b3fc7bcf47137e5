//! Profile image storage on the local file system.
//!
//! Images land in `UPLOAD_DIR/<kind>/<uuid>.<ext>` and are referenced from
//! records by their public path, `/uploads/<kind>/<file>`, which the router
//! serves with `ServeDir`.

use std::path::PathBuf;

use anyhow::anyhow;
use schoolhub_config::UploadConfig;
use schoolhub_core::AppError;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Teacher,
    Student,
}

impl ImageKind {
    pub fn dir(&self) -> &'static str {
        match self {
            ImageKind::Teacher => "teachers",
            ImageKind::Student => "students",
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Image exceeds maximum size of {max_bytes} bytes")]
    TooLarge { max_bytes: usize },
    #[error("Only image files are allowed (received {0})")]
    UnsupportedType(String),
    #[error("failed to store image: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Io(e) => AppError::internal(e),
            other => AppError::unprocessable(anyhow!(other.to_string())),
        }
    }
}

/// An image received from a client, not yet stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ImageStorage {
    root_dir: PathBuf,
    public_path: String,
    max_bytes: usize,
    allowed_mime_types: Vec<String>,
}

impl ImageStorage {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            root_dir: config.root_dir.clone(),
            public_path: config.public_path.trim_end_matches('/').to_string(),
            max_bytes: config.max_bytes,
            allowed_mime_types: config.allowed_mime_types.clone(),
        }
    }

    pub fn root_dir(&self) -> &PathBuf {
        &self.root_dir
    }

    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    /// Checks size and type without touching the disk.
    pub fn check(&self, upload: &ImageUpload) -> Result<(), UploadError> {
        if upload.bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                max_bytes: self.max_bytes,
            });
        }
        if !self
            .allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&upload.content_type))
        {
            return Err(UploadError::UnsupportedType(upload.content_type.clone()));
        }
        Ok(())
    }

    /// Writes the image and returns the public path to store on the record.
    #[instrument(skip(self, upload), fields(kind = kind.dir(), bytes = upload.bytes.len()))]
    pub async fn save(&self, kind: ImageKind, upload: &ImageUpload) -> Result<String, UploadError> {
        self.check(upload)?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension(&upload.content_type));
        let dir = self.root_dir.join(kind.dir());
        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(&file_name), &upload.bytes).await?;

        let public = format!("{}/{}/{}", self.public_path, kind.dir(), file_name);
        debug!(path = %public, "Image stored");
        Ok(public)
    }

    /// Removes a previously stored image. Missing files are ignored.
    pub async fn delete(&self, public: &str) {
        let Some(relative) = public
            .strip_prefix(&self.public_path)
            .map(|p| p.trim_start_matches('/'))
        else {
            return;
        };
        if relative.is_empty() || relative.contains("..") {
            return;
        }

        match fs::remove_file(self.root_dir.join(relative)).await {
            Ok(()) => debug!(path = %public, "Image removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %public, error = %e, "Failed to remove image"),
        }
    }
}

fn extension(content_type: &str) -> &'static str {
    match content_type.to_ascii_lowercase().as_str() {
        "image/png" => "png",
        "image/gif" => "gif",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: PathBuf) -> ImageStorage {
        ImageStorage::new(&UploadConfig {
            root_dir: dir,
            max_bytes: 16,
            ..UploadConfig::default()
        })
    }

    fn image(content_type: &str, len: usize) -> ImageUpload {
        ImageUpload {
            content_type: content_type.to_string(),
            bytes: vec![0u8; len],
        }
    }

    #[test]
    fn rejects_oversized_and_non_images() {
        let storage = storage(std::env::temp_dir());
        assert!(matches!(
            storage.check(&image("image/png", 17)),
            Err(UploadError::TooLarge { max_bytes: 16 })
        ));
        assert!(matches!(
            storage.check(&image("application/pdf", 4)),
            Err(UploadError::UnsupportedType(_))
        ));
        assert!(storage.check(&image("IMAGE/JPEG", 4)).is_ok());
    }

    #[tokio::test]
    async fn saves_under_kind_directory_and_deletes() {
        let root = std::env::temp_dir().join(format!("schoolhub-uploads-{}", Uuid::new_v4()));
        let storage = storage(root.clone());

        let public = storage
            .save(ImageKind::Teacher, &image("image/gif", 8))
            .await
            .unwrap();
        assert!(public.starts_with("/uploads/teachers/"));
        assert!(public.ends_with(".gif"));

        let on_disk = root.join(public.trim_start_matches("/uploads/"));
        assert!(on_disk.exists());

        storage.delete(&public).await;
        assert!(!on_disk.exists());

        let _ = std::fs::remove_dir_all(root);
    }
}
