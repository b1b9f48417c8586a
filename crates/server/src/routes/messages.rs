use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use service::auth::domain::Claims;
use service::messages;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
pub struct SendBody {
    #[serde(rename = "receiverId")]
    pub receiver_id: Option<Uuid>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OtherUserBody {
    #[serde(rename = "otherUserId")]
    pub other_user_id: Option<Uuid>,
}

#[utoipa::path(post, path = "/messages/send", tag = "messages", request_body = crate::openapi::SendMessageRequest, responses((status = 201, description = "Message sent"), (status = 400, description = "Missing required fields")))]
pub async fn send(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<SendBody>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ApiError> {
    let (Some(receiver_id), Some(content)) = (body.receiver_id, body.content) else {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    };
    let message = messages::send(&state.db, claims.uid, receiver_id, &content).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Message sent successfully", "messageId": message.id })),
    ))
}

#[utoipa::path(post, path = "/messages/conversation", tag = "messages", request_body = crate::openapi::OtherUserRequest, responses((status = 200, description = "Conversation with one user"), (status = 400, description = "Missing other user ID")))]
pub async fn conversation(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<OtherUserBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(other_user_id) = body.other_user_id else {
        return Err(ApiError::BadRequest("Missing other user ID".into()));
    };
    let messages = messages::conversation(&state.db, claims.uid, other_user_id).await?;
    Ok(Json(serde_json::json!(messages)))
}

#[utoipa::path(get, path = "/messages/conversations", tag = "messages", responses((status = 200, description = "Conversation summaries, newest first")))]
pub async fn conversations(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let summaries = messages::conversations(&state.db, claims.uid).await?;
    Ok(Json(serde_json::json!(summaries)))
}

#[utoipa::path(post, path = "/messages/read", tag = "messages", request_body = crate::openapi::OtherUserRequest, responses((status = 200, description = "Messages marked as read"), (status = 400, description = "Missing other user ID")))]
pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<OtherUserBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(other_user_id) = body.other_user_id else {
        return Err(ApiError::BadRequest("Missing other user ID".into()));
    };
    messages::mark_read(&state.db, claims.uid, other_user_id).await?;
    Ok(Json(serde_json::json!({ "message": "Messages marked as read" })))
}

#[utoipa::path(get, path = "/messages/unread-count", tag = "messages", responses((status = 200, description = "Unread message count")))]
pub async fn unread_count(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let count = messages::unread_count(&state.db, claims.uid).await?;
    Ok(Json(serde_json::json!({ "count": count })))
}
