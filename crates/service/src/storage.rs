//! On-disk media storage.
//!
//! Files live under `{root}/{media_type}/{file}` and are exposed to clients
//! as `/server/{media_type}/{file}` urls, which is also the form stored in
//! the `multimedia` table.

use std::path::{Component, Path, PathBuf};

use tracing::{info, warn};

use crate::errors::ServiceError;

/// Public url prefix shared with the frontend.
const URL_PREFIX: &str = "/server/";

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(cfg: &configs::MediaConfig) -> Self {
        Self::new(cfg.storage_root.clone())
    }

    /// Map a stored url back to its path on disk. Rejects urls outside the
    /// storage tree so a crafted record cannot read arbitrary files.
    pub fn resolve_url(&self, url: &str) -> Option<PathBuf> {
        let rest = url.strip_prefix(URL_PREFIX)?;
        let relative = Path::new(rest);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }

    pub fn public_url(media_type: &str, file_name: &str) -> String {
        format!("{URL_PREFIX}{media_type}/{file_name}")
    }

    /// Persist an uploaded file and hand back its public url.
    pub async fn save(
        &self,
        media_type: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, ServiceError> {
        let dir = self.root.join(media_type);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ServiceError::Io(e.to_string()))?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ServiceError::Io(e.to_string()))?;
        info!(path = %path.display(), size = bytes.len(), "media file stored");
        Ok(Self::public_url(media_type, file_name))
    }

    /// Best-effort removal of the file behind a stored url. Returns whether
    /// a file was actually unlinked; a missing file is logged, not an error.
    pub async fn remove_url(&self, url: &str) -> bool {
        let Some(path) = self.resolve_url(url) else {
            warn!(%url, "not a storage url, nothing to delete");
            return false;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "media file deleted");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "media file not deleted");
                false
            }
        }
    }
}

/// Bucket an upload by its declared media type, falling back to the
/// multipart content type.
pub fn infer_media_type(explicit: Option<&str>, content_type: Option<&str>) -> &'static str {
    if let Some(t) = explicit {
        match t {
            "photo" => return "photo",
            "video" => return "video",
            "audio" => return "audio",
            other => warn!(media_type = other, "unknown media type, inferring from content type"),
        }
    }
    match content_type {
        Some(ct) if ct.starts_with("video/") => "video",
        Some(ct) if ct.starts_with("audio/") => "audio",
        _ => "photo",
    }
}

/// Uploaded files keep their extension but the base name is flattened to
/// `[A-Za-z0-9_-]` and prefixed with a millisecond timestamp to avoid
/// collisions.
pub fn stored_file_name(original: &str, now_millis: i64) -> String {
    let original = Path::new(original);
    let ext = original
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let base: String = original
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload")
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    let base = if base.is_empty() { "upload".to_string() } else { base };
    format!("{now_millis}_{base}{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_file_name_is_sanitized() {
        let name = stored_file_name("my cute dog!.jpg", 1700000000000);
        assert_eq!(name, "1700000000000_my_cute_dog.jpg");
    }

    #[test]
    fn stored_file_name_survives_empty_base() {
        let name = stored_file_name("....", 42);
        assert!(name.starts_with("42_"));
    }

    #[test]
    fn infer_prefers_explicit_type() {
        assert_eq!(infer_media_type(Some("video"), Some("image/png")), "video");
        assert_eq!(infer_media_type(None, Some("audio/mpeg")), "audio");
        assert_eq!(infer_media_type(None, Some("image/png")), "photo");
        assert_eq!(infer_media_type(Some("hologram"), Some("video/mp4")), "video");
        assert_eq!(infer_media_type(None, None), "photo");
    }

    #[test]
    fn resolve_url_stays_inside_root() {
        let storage = MediaStorage::new("/data/media");
        let ok = storage.resolve_url("/server/photo/rex.jpg").unwrap();
        assert_eq!(ok, PathBuf::from("/data/media/photo/rex.jpg"));

        assert!(storage.resolve_url("/server/../etc/passwd").is_none());
        assert!(storage.resolve_url("/elsewhere/photo/rex.jpg").is_none());
    }

    #[test]
    fn public_url_round_trips_through_resolve() {
        let storage = MediaStorage::new("media");
        let url = MediaStorage::public_url("photo", "a.jpg");
        assert_eq!(storage.resolve_url(&url), Some(PathBuf::from("media/photo/a.jpg")));
    }
}
