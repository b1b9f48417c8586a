use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use service::animals::{self, CreateAnimalInput, FeedingItem, MedicalItem, MediaItem, RelationsInput};
use service::{newsletter, purge};

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
pub struct AnimalIdBody {
    #[serde(rename = "animalId")]
    pub animal_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SpeciesBody {
    pub species: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAnimalBody {
    #[serde(rename = "userID")]
    pub user_id: Option<Uuid>,
    pub name: Option<String>,
    pub breed: Option<String>,
    pub species: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[serde(default, rename = "feedingSchedule")]
    pub feeding_schedule: Vec<FeedingItem>,
    #[serde(default, rename = "medicalHistory")]
    pub medical_history: Vec<MedicalItem>,
    #[serde(default)]
    pub multimedia: Vec<MediaItem>,
    #[serde(default)]
    pub relations: Option<RelationsInput>,
}

#[derive(Debug, Deserialize)]
pub struct TopByCityQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<Uuid>,
}

#[utoipa::path(get, path = "/animals/all", tag = "animals", responses((status = 200, description = "All animals with cover photo"), (status = 401, description = "Unauthorized")))]
pub async fn get_all(State(state): State<ServerState>) -> Result<Json<serde_json::Value>, ApiError> {
    let cards = animals::list_all(&state.db).await?;
    Ok(Json(serde_json::json!(cards)))
}

#[utoipa::path(post, path = "/animals/details", tag = "animals", request_body = crate::openapi::AnimalIdRequest, responses((status = 200, description = "Full detail view"), (status = 400, description = "Missing animal id"), (status = 404, description = "Animal not found")))]
pub async fn details(
    State(state): State<ServerState>,
    Json(body): Json<AnimalIdBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(animal_id) = body.animal_id else {
        return Err(ApiError::BadRequest("Animal ID is required".into()));
    };
    if !animals::exists(&state.db, animal_id).await? {
        return Err(ApiError::NotFound("Animal not found".into()));
    }
    let details = animals::details(&state.db, animal_id).await?;
    Ok(Json(serde_json::json!(details)))
}

#[utoipa::path(post, path = "/animals/species", tag = "animals", request_body = crate::openapi::SpeciesRequest, responses((status = 200, description = "Animals and breed popularity"), (status = 404, description = "No animals for species")))]
pub async fn by_species(
    State(state): State<ServerState>,
    Json(body): Json<SpeciesBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Some(species) = body.species.filter(|s| !s.trim().is_empty()) else {
        return Err(ApiError::BadRequest("Species is required".into()));
    };
    let listing = animals::by_species(&state.db, &species).await?;
    if listing.animals.is_empty() {
        // popular breeds still go out with the 404 so the picker can render
        return Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "No animals found for this species",
                "popularBreeds": listing.popular_breeds,
            })),
        ));
    }
    Ok((StatusCode::OK, Json(serde_json::json!(listing))))
}

#[utoipa::path(post, path = "/animals/create", tag = "animals", request_body = crate::openapi::CreateAnimalRequest, responses((status = 201, description = "Animal created"), (status = 400, description = "Missing required animal fields")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(body): Json<CreateAnimalBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let (Some(user_id), Some(name), Some(breed), Some(species), Some(age), Some(gender)) =
        (body.user_id, body.name, body.breed, body.species, body.age, body.gender)
    else {
        return Err(ApiError::BadRequest("Missing required animal fields".into()));
    };

    let animal_id = animals::create(
        &state.db,
        CreateAnimalInput {
            user_id,
            name,
            breed,
            species,
            age,
            gender,
            feeding_schedule: body.feeding_schedule,
            medical_history: body.medical_history,
            multimedia: body.multimedia,
            relations: body.relations,
        },
    )
    .await?;

    // Newsletter fan-out happens after the response; failures only log.
    if let Some(mailer) = state.mailer.clone() {
        let db = state.db.clone();
        tokio::spawn(async move {
            newsletter::announce_animal(&db, &mailer, animal_id).await;
        });
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Animal and related data created successfully",
            "animalId": animal_id,
        })),
    ))
}

#[utoipa::path(delete, path = "/animals/delete", tag = "animals", request_body = crate::openapi::AnimalIdRequest, responses((status = 200, description = "Animal and related data deleted"), (status = 404, description = "Animal not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Json(body): Json<AnimalIdBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(animal_id) = body.animal_id else {
        return Err(ApiError::BadRequest("Animal ID is required".into()));
    };
    if !animals::exists(&state.db, animal_id).await? {
        return Err(ApiError::NotFound("Animal not found".into()));
    }

    let report = purge::purge_animal(&state.db, &state.storage, animal_id).await?;
    if !report.fully_clean() {
        error!(%animal_id, report = ?report, "animal deleted with partial cleanup");
    }

    Ok(Json(serde_json::json!({ "message": "Animal and all related data successfully deleted" })))
}

#[utoipa::path(get, path = "/animals/top-by-city", tag = "animals", responses((status = 200, description = "Animals in the requester's city"), (status = 400, description = "Missing user id")))]
pub async fn top_by_city(
    State(state): State<ServerState>,
    Query(query): Query<TopByCityQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(user_id) = query.user_id else {
        return Err(ApiError::BadRequest("User ID is required".into()));
    };
    let cards = animals::top_by_city(&state.db, user_id).await?;
    Ok(Json(serde_json::json!(cards)))
}
