//! Storage for uploaded post images under the media root.

use std::path::PathBuf;

use quill_core::media::{post_image_path, ImageKind, POST_IMAGE_DIR};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// URL prefix the media root is served under.
pub const MEDIA_URL: &str = "/media";

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Write an already validated image and return its path relative to the root.
    pub async fn save_post_image(&self, bytes: &[u8], kind: ImageKind) -> AppResult<String> {
        let relative = post_image_path(&Uuid::new_v4().to_string(), kind);
        let dir = self.root.join(POST_IMAGE_DIR);

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to create {}: {e}", dir.display())))?;

        let path = self.root.join(&relative);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to write {}: {e}", path.display())))?;

        tracing::info!(path = %relative, size = bytes.len(), "Stored post image");
        Ok(relative)
    }

    /// Delete a stored image that ended up unused. Failures are logged only.
    pub async fn remove_post_image(&self, relative: &str) {
        let path = self.root.join(relative);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::info!(path = %relative, "Removed unused post image"),
            Err(e) => tracing::warn!(path = %relative, error = %e, "Failed to remove post image"),
        }
    }
}

/// Public URL of a stored media file.
pub fn media_url(relative: &str) -> String {
    format!("{MEDIA_URL}/{relative}")
}
