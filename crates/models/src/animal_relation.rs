use sea_orm::{entity::prelude::*, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::animal;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "animal_relation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub animal_id: Uuid,
    pub friend_with: String,
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

pub async fn create(db: &DatabaseConnection, animal_id: Uuid, friend_with: &str) -> Result<Model, ModelError> {
    if friend_with.trim().is_empty() {
        return Err(ModelError::Validation("friend_with required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        animal_id: Set(animal_id),
        friend_with: Set(friend_with.to_string()),
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
