use sea_orm::{entity::prelude::*, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::animal;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "medical_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub animal_id: Uuid,
    pub vet_number: String,
    pub record_date: DateTimeWithTimeZone,
    pub description: Option<String>,
    pub first_aid_noted: bool,
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
    vet_number: &str,
    record_date: DateTimeWithTimeZone,
    description: Option<String>,
    first_aid_noted: bool,
) -> Result<Model, ModelError> {
    if vet_number.trim().is_empty() {
        return Err(ModelError::Validation("vet number required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        animal_id: Set(animal_id),
        vet_number: Set(vet_number.to_string()),
        record_date: Set(record_date),
        description: Set(description),
        first_aid_noted: Set(first_aid_noted),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_animal(db: &DatabaseConnection, animal_id: Uuid) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::AnimalId.eq(animal_id))
        .all(db)
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
