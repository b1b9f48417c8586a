use sea_orm::{entity::prelude::*, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::animal;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feeding_schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub animal_id: Uuid,
    /// JSON array of "HH:MM" strings
    pub feeding_times: Json,
    pub food_type: String,
    pub notes: Option<String>,
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

pub fn validate_feeding_times(times: &[String]) -> Result<(), ModelError> {
    if times.is_empty() {
        return Err(ModelError::Validation("at least one feeding time required".into()));
    }
    for t in times {
        NaiveTime::parse_from_str(t, "%H:%M")
            .map_err(|_| ModelError::Validation(format!("invalid feeding time: {t}")))?;
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    animal_id: Uuid,
    feeding_times: &[String],
    food_type: &str,
    notes: Option<String>,
) -> Result<Model, ModelError> {
    validate_feeding_times(feeding_times)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        animal_id: Set(animal_id),
        feeding_times: Set(serde_json::json!(feeding_times)),
        food_type: Set(food_type.to_string()),
        notes: Set(notes),
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

#[cfg(test)]
mod tests {
    use super::validate_feeding_times;

    #[test]
    fn accepts_well_formed_times() {
        let times = vec!["08:00".to_string(), "18:30".to_string()];
        assert!(validate_feeding_times(&times).is_ok());
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert!(validate_feeding_times(&[]).is_err());
        assert!(validate_feeding_times(&["25:00".to_string()]).is_err());
        assert!(validate_feeding_times(&["8 o'clock".to_string()]).is_err());
    }
}
