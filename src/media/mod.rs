/// Media storage for uploaded images
///
/// Files live under `{media_dir}/{bucket}/` with a random prefix so re-uploads
/// never overwrite each other. Public URLs are served by `GET /media/{*path}`.

use crate::content::slug::slugify;
use crate::error::{AppError, AppResult};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "gif", "svg", "avif"];

/// Result of an upload
#[derive(Debug, Clone, Serialize)]
pub struct StoredMedia {
    /// Path relative to the media root, e.g. "projects/3f2a…-hero.jpg"
    pub path: String,
    pub public_url: String,
    pub size: u64,
}

/// Content type for a stored file, from its extension
pub fn content_type_for(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Local-disk object storage
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    base_url: String,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Public URL of a stored path
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/media/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Store an uploaded image in `bucket` under a sanitized, unique name
    pub async fn upload(&self, bucket: &str, filename: &str, bytes: &[u8]) -> AppResult<StoredMedia> {
        let bucket = slugify(bucket);
        if bucket.is_empty() {
            return Err(AppError::Validation("Bucket name is required".to_string()));
        }
        if bytes.is_empty() {
            return Err(AppError::Validation("Upload is empty".to_string()));
        }

        let original = Path::new(filename);
        let extension = original
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
            .ok_or_else(|| AppError::Validation(format!("'{}' is not a supported image type", filename)))?;

        let stem = original
            .file_stem()
            .and_then(|s| s.to_str())
            .map(slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "image".to_string());

        let name = format!("{}-{}.{}", uuid::Uuid::new_v4(), stem, extension);
        let directory = self.root.join(&bucket);
        tokio::fs::create_dir_all(&directory).await?;
        tokio::fs::write(directory.join(&name), bytes).await?;

        let path = format!("{}/{}", bucket, name);
        tracing::info!("🖼️ Stored media {} ({} bytes)", path, bytes.len());

        Ok(StoredMedia {
            public_url: self.public_url(&path),
            path,
            size: bytes.len() as u64,
        })
    }

    /// Resolve a public path to a file inside the media root
    pub fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let safe = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !safe || relative.as_os_str().is_empty() {
            return Err(AppError::NotFound(format!("Media {}", path)));
        }
        Ok(self.root.join(relative))
    }

    /// Read a stored file
    pub async fn read(&self, path: &str) -> AppResult<Vec<u8>> {
        let file = self.resolve(path)?;
        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("Media {}", path)))
            }
            Err(e) => Err(e.into()),
        }
    }
}
