use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use service::auth::domain::Claims;
use service::{purge, users};

use crate::errors::ApiError;
use crate::routes::auth::{require_admin, ServerState};

#[derive(Debug, Deserialize)]
pub struct UserIdBody {
    #[serde(rename = "userId")]
    pub user_id: Option<Uuid>,
}

#[utoipa::path(get, path = "/users/all/details", tag = "users", responses((status = 200, description = "All users with addresses and animals"), (status = 403, description = "Admin privileges required")))]
pub async fn all_details(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&claims)?;
    let users = users::list_all_with_details(&state.db).await?;
    Ok(Json(serde_json::json!(users)))
}

#[utoipa::path(delete, path = "/users/delete", tag = "users", request_body = crate::openapi::UserIdRequest, responses((status = 200, description = "User and related data deleted"), (status = 403, description = "Admin privileges required"), (status = 404, description = "User not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<UserIdBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&claims)?;
    let Some(user_id) = body.user_id else {
        return Err(ApiError::BadRequest("User ID is required".into()));
    };
    if users::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".into()));
    }

    let report = purge::purge_user(&state.db, &state.storage, user_id).await?;
    if !report.fully_clean() {
        error!(%user_id, report = ?report, "user deleted with partial cleanup");
    }

    Ok(Json(serde_json::json!({ "message": "User and all related data successfully deleted" })))
}
