//! Stores uploaded post images under the configured media root. Only
//! the relative path (e.g. `posts/<uuid>.png`) is persisted with the
//! post; serving the files back is left to the front proxy.

use std::path::{Path, PathBuf};

use actix_multipart::form::tempfile::TempFile;
use actix_web::web;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, Error)]
pub enum MediaError {
    /// User-facing rejection, shown as a field error on the form.
    #[error("{0}")]
    Invalid(String),
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
    max_bytes: usize,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    /// Rejects oversized uploads and unknown extensions without
    /// touching the filesystem, returning the extension to store under.
    pub fn validate_image(&self, upload: &TempFile) -> Result<String, MediaError> {
        if upload.size > self.max_bytes {
            return Err(MediaError::Invalid(format!(
                "image exceeds the {} byte limit",
                self.max_bytes
            )));
        }
        image_ext(upload.file_name.as_deref()).ok_or_else(|| {
            MediaError::Invalid("unsupported image type; use png, jpg, gif or webp".into())
        })
    }

    /// Persists a validated upload, returning the relative path stored
    /// on the post.
    pub async fn save_image(&self, upload: &TempFile) -> Result<String, MediaError> {
        let ext = self.validate_image(upload)?;

        let relative = format!("posts/{}.{ext}", Uuid::new_v4());
        let dest = self.root.join(&relative);
        let src = upload.file.path().to_path_buf();

        web::block(move || -> std::io::Result<()> {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            // copy rather than rename: the temp file may sit on
            // another filesystem
            std::fs::copy(&src, &dest)?;
            Ok(())
        })
        .await
        .map_err(|e| MediaError::Io(std::io::Error::other(e)))??;

        info!(path = %relative, "image stored");
        Ok(relative)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// The lowercased extension when the client file name carries an
/// allowed image extension.
fn image_ext(file_name: Option<&str>) -> Option<String> {
    let name = file_name?;
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}
