use axum::{
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod animals;
pub mod auth;
pub mod media;
pub mod messages;
pub mod newsletter;
pub mod users;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public routes (auth, media pipe,
/// upload, docs, static frontend) plus the bearer-token-protected API.
pub fn build_router(cors: CorsLayer, state: auth::ServerState) -> Router {
    let static_dir = ServeDir::new("frontend").fallback(ServeFile::new("frontend/index.html"));

    // Public routes: login/signup, the media pipe and uploads
    let public = Router::new()
        .route("/health", get(health))
        .route("/users/login", post(auth::login))
        .route("/users/signup", post(auth::signup))
        .route("/admin/login", post(auth::admin_login))
        .route("/media/pipe/:id", get(media::pipe))
        .route("/upload", post(media::upload));

    // Everything else requires a bearer token; admin routes additionally
    // check the admin claim in their handlers.
    let protected = Router::new()
        .route("/users/all/details", get(users::all_details))
        .route("/users/delete", delete(users::delete))
        .route("/animals/all", get(animals::get_all))
        .route("/animals/details", post(animals::details))
        .route("/animals/species", post(animals::by_species))
        .route("/animals/create", post(animals::create))
        .route("/animals/delete", delete(animals::delete))
        .route("/animals/top-by-city", get(animals::top_by_city))
        .route("/messages/send", post(messages::send))
        .route("/messages/conversation", post(messages::conversation))
        .route("/messages/conversations", get(messages::conversations))
        .route("/messages/read", post(messages::mark_read))
        .route("/messages/unread-count", get(messages::unread_count))
        .route("/newsletter/subscriptions", get(newsletter::subscriptions))
        .route("/newsletter/update", post(newsletter::update))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(static_dir)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
