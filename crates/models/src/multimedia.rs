use sea_orm::{entity::prelude::*, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::animal;
use crate::errors::ModelError;

/// Media kind buckets; double as the on-disk subdirectory names.
pub const MEDIA_TYPES: [&str; 3] = ["photo", "video", "audio"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "multimedia")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub animal_id: Uuid,
    pub media_type: String,
    pub url: String,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub upload_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Animal }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Animal => Entity::belongs_to(animal::Entity)
                .from(Column::AnimalId)
                .to(animal::Column::Id)
                .into(),
        }
    }
}

impl Related<animal::Entity> for Entity {
    fn to() -> RelationDef { Relation::Animal.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    animal_id: Uuid,
    media_type: &str,
    url: &str,
    mime_type: Option<String>,
    description: Option<String>,
) -> Result<Model, ModelError> {
    if url.trim().is_empty() {
        return Err(ModelError::Validation("url required".into()));
    }
    if !MEDIA_TYPES.contains(&media_type) {
        return Err(ModelError::Validation(format!("unknown media type: {media_type}")));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        animal_id: Set(animal_id),
        media_type: Set(media_type.to_string()),
        url: Set(url.to_string()),
        mime_type: Set(mime_type),
        description: Set(description),
        upload_date: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_animal(db: &DatabaseConnection, animal_id: Uuid) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::AnimalId.eq(animal_id))
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// At most one record per animal; gallery cards only need a cover photo.
pub async fn find_first_by_animal(db: &DatabaseConnection, animal_id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::AnimalId.eq(animal_id))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn delete_by_animal(db: &DatabaseConnection, animal_id: Uuid) -> Result<u64, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::AnimalId.eq(animal_id))
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
