use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use service::auth::domain::Claims;
use service::newsletter;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
    #[serde(default)]
    pub species: Vec<String>,
}

#[utoipa::path(get, path = "/newsletter/subscriptions", tag = "newsletter", responses((status = 200, description = "Active subscriptions for the token user")))]
pub async fn subscriptions(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let subs = newsletter::subscriptions(&state.db, claims.uid).await?;
    Ok(Json(serde_json::json!(subs)))
}

#[utoipa::path(post, path = "/newsletter/update", tag = "newsletter", request_body = crate::openapi::NewsletterUpdateRequest, responses((status = 200, description = "Subscriptions replaced")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    newsletter::update_subscriptions(&state.db, claims.uid, &body.species).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
