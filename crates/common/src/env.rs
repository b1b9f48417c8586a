//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure the media storage tree exists; warn when the frontend bundle is
/// missing (static assets will 404 but the API still works).
pub async fn ensure_env(frontend_dir: &str, storage_root: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(%frontend_dir, "frontend assets directory not found; static assets may 404");
    }
    for media_type in ["photo", "video", "audio"] {
        let dir = format!("{}/{}", storage_root.trim_end_matches('/'), media_type);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {dir}: {e}"))?;
    }
    Ok(())
}
