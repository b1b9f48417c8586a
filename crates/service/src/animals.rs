//! Animal listing, detail assembly and creation with child records.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::{address, animal, animal_relation, feeding_schedule, medical_history, multimedia, user};

use crate::errors::ServiceError;

/// A multimedia row plus the pipe url the frontend streams it from.
#[derive(Debug, Clone, Serialize)]
pub struct MediaRecord {
    #[serde(flatten)]
    pub record: multimedia::Model,
    #[serde(rename = "pipeUrl")]
    pub pipe_url: String,
}

impl From<multimedia::Model> for MediaRecord {
    fn from(record: multimedia::Model) -> Self {
        let pipe_url = format!("/media/pipe/{}", record.id);
        Self { record, pipe_url }
    }
}

/// Gallery card: the animal plus at most one cover photo.
#[derive(Debug, Clone, Serialize)]
pub struct AnimalCard {
    #[serde(flatten)]
    pub animal: animal::Model,
    pub multimedia: Vec<MediaRecord>,
}

/// An animal with all of its child records (admin dashboards).
#[derive(Debug, Clone, Serialize)]
pub struct AnimalWithChildren {
    #[serde(flatten)]
    pub animal: animal::Model,
    pub multimedia: Vec<MediaRecord>,
    #[serde(rename = "feedingSchedule")]
    pub feeding_schedule: Vec<feeding_schedule::Model>,
    #[serde(rename = "medicalHistory")]
    pub medical_history: Vec<medical_history::Model>,
    pub relations: Vec<animal_relation::Model>,
}

/// Full detail view: children plus owner and owner's address.
#[derive(Debug, Clone, Serialize)]
pub struct AnimalDetails {
    pub animal: animal::Model,
    pub multimedia: Vec<MediaRecord>,
    #[serde(rename = "feedingSchedule")]
    pub feeding_schedule: Vec<feeding_schedule::Model>,
    #[serde(rename = "medicalHistory")]
    pub medical_history: Vec<medical_history::Model>,
    pub owner: Option<user::Model>,
    pub address: Option<address::Model>,
    pub relations: Vec<animal_relation::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesListing {
    pub animals: Vec<AnimalCard>,
    #[serde(rename = "popularBreeds")]
    pub popular_breeds: Vec<animal::BreedCount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedingItem {
    #[serde(rename = "feedingTime")]
    pub feeding_time: String,
    #[serde(rename = "foodType")]
    pub food_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MedicalItem {
    #[serde(rename = "vetNumber")]
    pub vet_number: String,
    #[serde(rename = "recordDate")]
    pub record_date: String,
    pub description: Option<String>,
    #[serde(default)]
    pub first_aid_noted: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "mediaType")]
    pub media_type: String,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationsInput {
    #[serde(rename = "friendWith")]
    pub friend_with: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnimalInput {
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    pub name: String,
    pub breed: String,
    pub species: String,
    pub age: i32,
    pub gender: String,
    #[serde(default, rename = "feedingSchedule")]
    pub feeding_schedule: Vec<FeedingItem>,
    #[serde(default, rename = "medicalHistory")]
    pub medical_history: Vec<MedicalItem>,
    #[serde(default)]
    pub multimedia: Vec<MediaItem>,
    #[serde(default)]
    pub relations: Option<RelationsInput>,
}

async fn card_for(db: &DatabaseConnection, a: animal::Model) -> Result<AnimalCard, ServiceError> {
    let cover = multimedia::find_first_by_animal(db, a.id).await?;
    Ok(AnimalCard { animal: a, multimedia: cover.into_iter().map(MediaRecord::from).collect() })
}

/// All animals, each with its cover photo.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<AnimalCard>, ServiceError> {
    let animals = animal::find_all(db).await?;
    let mut cards = Vec::with_capacity(animals.len());
    for a in animals {
        cards.push(card_for(db, a).await?);
    }
    Ok(cards)
}

pub async fn exists(db: &DatabaseConnection, animal_id: Uuid) -> Result<bool, ServiceError> {
    Ok(animal::exists(db, animal_id).await?)
}

/// Detail view; every hit counts as a view.
#[instrument(skip(db))]
pub async fn details(db: &DatabaseConnection, animal_id: Uuid) -> Result<AnimalDetails, ServiceError> {
    let a = animal::find_by_id(db, animal_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("animal"))?;
    animal::increment_views(db, animal_id).await?;

    let media = multimedia::find_by_animal(db, animal_id).await?;
    let feeding = feeding_schedule::find_by_animal(db, animal_id).await?;
    let medical = medical_history::find_by_animal(db, animal_id).await?;
    let relations = animal_relation::find_by_animal(db, animal_id).await?;
    let owner = user::find_by_id(db, a.user_id).await?;
    let owner_address = address::find_by_user(db, a.user_id).await?;

    Ok(AnimalDetails {
        animal: a,
        multimedia: media.into_iter().map(MediaRecord::from).collect(),
        feeding_schedule: feeding,
        medical_history: medical,
        owner,
        address: owner_address,
        relations,
    })
}

/// Animals of one species plus breed popularity for the species picker.
pub async fn by_species(db: &DatabaseConnection, species: &str) -> Result<SpeciesListing, ServiceError> {
    let animals = animal::find_by_species(db, species).await?;
    let popular_breeds = animal::popular_breeds_by_species(db, species).await.unwrap_or_else(|e| {
        warn!(%species, error = %e, "breed popularity query failed");
        Vec::new()
    });
    let mut cards = Vec::with_capacity(animals.len());
    for a in animals {
        cards.push(card_for(db, a).await?);
    }
    Ok(SpeciesListing { animals: cards, popular_breeds })
}

/// Animals listed in the requester's city, most viewed first. Users with
/// no address on file simply get an empty gallery.
pub async fn top_by_city(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<AnimalCard>, ServiceError> {
    let Some(addr) = address::find_by_user(db, user_id).await? else {
        return Ok(Vec::new());
    };
    if addr.city.trim().is_empty() {
        return Ok(Vec::new());
    }
    let animals = animal::find_by_city(db, &addr.city).await?;
    let mut cards = Vec::with_capacity(animals.len());
    for a in animals {
        cards.push(card_for(db, a).await?);
    }
    Ok(cards)
}

/// Everything owned by one user, fully expanded (admin view).
pub async fn with_children_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<AnimalWithChildren>, ServiceError> {
    let animals = animal::find_by_user(db, user_id).await?;
    let mut out = Vec::with_capacity(animals.len());
    for a in animals {
        let media = multimedia::find_by_animal(db, a.id).await?;
        let feeding = feeding_schedule::find_by_animal(db, a.id).await?;
        let medical = medical_history::find_by_animal(db, a.id).await?;
        let relations = animal_relation::find_by_animal(db, a.id).await?;
        out.push(AnimalWithChildren {
            animal: a,
            multimedia: media.into_iter().map(MediaRecord::from).collect(),
            feeding_schedule: feeding,
            medical_history: medical,
            relations,
        });
    }
    Ok(out)
}

fn parse_record_date(raw: &str) -> Result<DateTime<Utc>, ServiceError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| ServiceError::Validation(format!("invalid record date: {raw}")))
}

/// Create an animal together with its child records. Multimedia entries
/// without a url are skipped (the upload may have failed client-side);
/// everything else is validated and fails the whole request.
#[instrument(skip(db, input), fields(name = %input.name, species = %input.species))]
pub async fn create(db: &DatabaseConnection, input: CreateAnimalInput) -> Result<Uuid, ServiceError> {
    let created = animal::create(
        db,
        input.user_id,
        &input.name,
        &input.breed,
        &input.species,
        input.age,
        &input.gender,
    )
    .await?;

    if !input.feeding_schedule.is_empty() {
        let times: Vec<String> = input.feeding_schedule.iter().map(|i| i.feeding_time.clone()).collect();
        let food_type = input
            .feeding_schedule
            .iter()
            .map(|i| i.food_type.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        feeding_schedule::create(db, created.id, &times, &food_type, Some("Scheduled feeding times".into())).await?;
    }

    for item in &input.medical_history {
        let record_date = parse_record_date(&item.record_date)?;
        medical_history::create(
            db,
            created.id,
            &item.vet_number,
            record_date.into(),
            item.description.clone(),
            item.first_aid_noted,
        )
        .await?;
    }

    for item in &input.multimedia {
        let Some(url) = item.url.as_deref().filter(|u| !u.trim().is_empty()) else {
            warn!(animal_id = %created.id, "multimedia item without url, skipping");
            continue;
        };
        let mime = mime_guess::from_path(url).first().map(|m| m.to_string());
        multimedia::create(db, created.id, &item.media_type, url, mime, item.description.clone()).await?;
    }

    if let Some(relations) = &input.relations {
        if !relations.friend_with.trim().is_empty() {
            animal_relation::create(db, created.id, &relations.friend_with).await?;
        }
    }

    info!(animal_id = %created.id, "animal created");
    Ok(created.id)
}
