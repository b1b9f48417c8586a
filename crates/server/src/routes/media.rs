use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use service::media;
use service::storage;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
pub struct PipeQuery {
    pub width: Option<u32>,
}

fn media_response(mime: &str, etag: String, body: Vec<u8>) -> Result<Response, ApiError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime)
        .header(header::CACHE_CONTROL, media::CACHE_CONTROL)
        .header(header::ETAG, etag)
        .body(Body::from(body))
        .map_err(|e| ApiError::internal(e.to_string()))
}

/// Stream a stored media file, optionally re-encoding raster images to the
/// requested width with WebP/JPEG negotiation. Non-images and gifs go out
/// unmodified.
#[utoipa::path(get, path = "/media/pipe/{id}", tag = "media", params(("id" = Uuid, Path, description = "Multimedia record id"), ("width" = Option<u32>, Query, description = "Requested output width")), responses((status = 200, description = "Media bytes"), (status = 404, description = "Media not found")))]
pub async fn pipe(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PipeQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let record = models::multimedia::find_by_id(&state.db, id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("Media not found".into()))?;

    let file_path = state
        .storage
        .resolve_url(&record.url)
        .ok_or_else(|| ApiError::NotFound("Invalid media path".into()))?;
    if tokio::fs::metadata(&file_path).await.is_err() {
        return Err(ApiError::NotFound("Media file not found on disk".into()));
    }

    let stored_mime = record.mime_type.as_deref().unwrap_or("application/octet-stream");
    let width = query.width.map(|w| media::clamp_width(w, &state.media));

    match width {
        Some(width) if media::is_resizable_image(Some(stored_mime)) => {
            let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
            let format = media::negotiate_format(accept);
            let etag = media::etag(record.id, Some(width));
            let bytes = media::transcode_to_width(file_path, width, format)
                .await
                .map_err(|e| ApiError::internal(e.to_string()))?;
            media_response(format.mime(), etag, bytes)
        }
        _ => {
            // non-images, gifs and width-less requests stream unmodified
            let etag = media::etag(record.id, None);
            let bytes = tokio::fs::read(&file_path)
                .await
                .map_err(|e| ApiError::internal(e.to_string()))?;
            media_response(stored_mime, etag, bytes)
        }
    }
}

/// Multipart upload: a `file` part plus an optional `mediaType` part.
/// The file lands under the type-specific directory and the response
/// carries the public url to store on the multimedia record.
#[utoipa::path(post, path = "/upload", tag = "media", responses((status = 200, description = "File stored"), (status = 400, description = "No file uploaded")))]
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut media_type_field: Option<String> = None;
    let mut file: Option<(String, Option<String>, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("mediaType") => {
                media_type_field = Some(field.text().await.map_err(|e| ApiError::BadRequest(e.to_string()))?);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest(e.to_string()))?;
                file = Some((file_name, content_type, bytes));
            }
            _ => {}
        }
    }

    let Some((file_name, content_type, bytes)) = file else {
        return Err(ApiError::BadRequest("No file uploaded".into()));
    };

    let media_type = storage::infer_media_type(media_type_field.as_deref(), content_type.as_deref());
    let stored_name = storage::stored_file_name(&file_name, chrono::Utc::now().timestamp_millis());
    let url = state.storage.save(media_type, &stored_name, &bytes).await?;

    info!(%url, media_type, size = bytes.len(), "upload stored");
    Ok(Json(serde_json::json!({ "success": true, "filePath": url })))
}
