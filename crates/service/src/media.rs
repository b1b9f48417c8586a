//! Resize-and-serve policy for the media pipe endpoint.
//!
//! The decisions (clamp, format negotiation, resize eligibility) are pure
//! functions; only [`transcode_to_width`] touches the filesystem. Handlers
//! compose these with [`crate::storage::MediaStorage`].

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::GenericImageView;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Cache policy for everything the pipe serves.
pub const CACHE_CONTROL: &str = "public, max-age=86400";

const JPEG_QUALITY: u8 = 80;

/// Negotiated output encoding for resized images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
        }
    }
}

/// WebP when the client advertises support, JPEG as the baseline.
pub fn negotiate_format(accept: Option<&str>) -> OutputFormat {
    match accept {
        Some(header) if header.contains("image/webp") => OutputFormat::Webp,
        _ => OutputFormat::Jpeg,
    }
}

/// Clamp a requested width into the configured safe range.
pub fn clamp_width(requested: u32, cfg: &configs::MediaConfig) -> u32 {
    requested.clamp(cfg.min_width, cfg.max_width)
}

/// Only raster images are re-encoded; animated gifs and non-images are
/// streamed unmodified.
pub fn is_resizable_image(mime: Option<&str>) -> bool {
    match mime {
        Some(m) => m.starts_with("image/") && m != "image/gif",
        None => false,
    }
}

/// Identity tag derived from the record id and the requested width.
pub fn etag(id: Uuid, width: Option<u32>) -> String {
    match width {
        Some(w) => format!("\"{id}-{w}\""),
        None => format!("\"{id}-orig\""),
    }
}

/// Small targets get the sharper (and slower) kernel.
fn filter_for_width(width: u32) -> FilterType {
    if width < 300 {
        FilterType::Lanczos3
    } else {
        FilterType::CatmullRom
    }
}

/// Decode, scale down to at most `width` (never enlarging) and re-encode.
/// Decoding is CPU-bound, so the work runs on the blocking pool.
pub async fn transcode_to_width(
    path: PathBuf,
    width: u32,
    format: OutputFormat,
) -> Result<Vec<u8>, ServiceError> {
    tokio::task::spawn_blocking(move || transcode_blocking(&path, width, format))
        .await
        .map_err(|e| ServiceError::Media(e.to_string()))?
}

fn transcode_blocking(path: &Path, width: u32, format: OutputFormat) -> Result<Vec<u8>, ServiceError> {
    let img = image::open(path).map_err(|e| ServiceError::Media(e.to_string()))?;
    let img = if img.width() > width {
        img.resize(width, u32::MAX, filter_for_width(width))
    } else {
        img
    };

    let mut buf = Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = image::DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
            rgb.write_with_encoder(encoder)
                .map_err(|e| ServiceError::Media(e.to_string()))?;
        }
        OutputFormat::Webp => {
            let rgba = image::DynamicImage::ImageRgba8(img.to_rgba8());
            let encoder = WebPEncoder::new_lossless(&mut buf);
            rgba.write_with_encoder(encoder)
                .map_err(|e| ServiceError::Media(e.to_string()))?;
        }
    }
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media_cfg() -> configs::MediaConfig {
        configs::MediaConfig { storage_root: "server".into(), min_width: 50, max_width: 2000 }
    }

    #[test]
    fn width_is_clamped_to_safe_range() {
        let cfg = media_cfg();
        assert_eq!(clamp_width(10, &cfg), 50);
        assert_eq!(clamp_width(640, &cfg), 640);
        assert_eq!(clamp_width(99_999, &cfg), 2000);
    }

    #[test]
    fn format_negotiation_reads_accept_header() {
        assert_eq!(negotiate_format(Some("image/avif,image/webp,*/*;q=0.8")), OutputFormat::Webp);
        assert_eq!(negotiate_format(Some("text/html,*/*")), OutputFormat::Jpeg);
        assert_eq!(negotiate_format(None), OutputFormat::Jpeg);
    }

    #[test]
    fn gif_and_non_images_are_not_resized() {
        assert!(is_resizable_image(Some("image/jpeg")));
        assert!(is_resizable_image(Some("image/png")));
        assert!(!is_resizable_image(Some("image/gif")));
        assert!(!is_resizable_image(Some("video/mp4")));
        assert!(!is_resizable_image(None));
    }

    #[test]
    fn etag_encodes_id_and_width() {
        let id = Uuid::nil();
        assert_eq!(etag(id, Some(640)), format!("\"{id}-640\""));
        assert_eq!(etag(id, None), format!("\"{id}-orig\""));
    }

    #[tokio::test]
    async fn transcode_scales_down_but_never_up() -> Result<(), ServiceError> {
        let dir = std::env::temp_dir().join("pet_adoption_media_tests");
        std::fs::create_dir_all(&dir).map_err(|e| ServiceError::Io(e.to_string()))?;
        let path = dir.join(format!("{}.png", Uuid::new_v4()));

        let img = image::RgbImage::from_pixel(400, 200, image::Rgb([120, 80, 40]));
        img.save(&path).map_err(|e| ServiceError::Media(e.to_string()))?;

        let jpeg = transcode_to_width(path.clone(), 100, OutputFormat::Jpeg).await?;
        let decoded = image::load_from_memory(&jpeg).map_err(|e| ServiceError::Media(e.to_string()))?;
        assert_eq!(decoded.width(), 100);
        assert_eq!(decoded.height(), 50);

        // smaller than the source width: no enlargement, just re-encode
        let webp = transcode_to_width(path.clone(), 1000, OutputFormat::Webp).await?;
        let decoded = image::load_from_memory(&webp).map_err(|e| ServiceError::Media(e.to_string()))?;
        assert_eq!(decoded.width(), 400);

        let _ = std::fs::remove_file(&path);
        Ok(())
    }

    #[tokio::test]
    async fn transcode_missing_file_is_an_error() {
        let res = transcode_to_width(PathBuf::from("/nonexistent/nope.png"), 100, OutputFormat::Jpeg).await;
        assert!(res.is_err());
    }
}
