use sea_orm::{
    entity::prelude::*, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "animal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub breed: String,
    pub species: String,
    pub age: i32,
    pub gender: String,
    pub views: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Multimedia,
    FeedingSchedule,
    MedicalHistory,
    AnimalRelation,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::Multimedia => Entity::has_many(crate::multimedia::Entity).into(),
            Relation::FeedingSchedule => Entity::has_many(crate::feeding_schedule::Entity).into(),
            Relation::MedicalHistory => Entity::has_many(crate::medical_history::Entity).into(),
            Relation::AnimalRelation => Entity::has_many(crate::animal_relation::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<crate::multimedia::Entity> for Entity {
    fn to() -> RelationDef { Relation::Multimedia.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Breed popularity bucket for a species.
#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct BreedCount {
    pub breed: String,
    pub breed_count: i64,
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    name: &str,
    breed: &str,
    species: &str,
    age: i32,
    gender: &str,
) -> Result<Model, ModelError> {
    if name.trim().is_empty() || breed.trim().is_empty() || species.trim().is_empty() {
        return Err(ModelError::Validation("name, breed and species required".into()));
    }
    if age < 0 {
        return Err(ModelError::Validation("age must be non-negative".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        name: Set(name.to_string()),
        breed: Set(breed.to_string()),
        species: Set(species.to_string()),
        age: Set(age),
        gender: Set(gender.to_string()),
        views: Set(0),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Entity::find().all(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_species(db: &DatabaseConnection, species: &str) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::Species.eq(species))
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn exists(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    let count = Entity::find_by_id(id)
        .count(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(count > 0)
}

/// Bump the view counter in place; listing pages call this on every detail hit.
pub async fn increment_views(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    Entity::update_many()
        .col_expr(Column::Views, Expr::col(Column::Views).add(1))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(())
}

/// Remove the animal row itself. Child rows are the purge orchestrator's
/// responsibility; this returns the affected row count for its report.
pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<u64, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await.map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}

/// Breeds of a species ranked by how many animals carry them.
pub async fn popular_breeds_by_species(
    db: &DatabaseConnection,
    species: &str,
) -> Result<Vec<BreedCount>, ModelError> {
    Entity::find()
        .select_only()
        .column(Column::Breed)
        .column_as(Column::Id.count(), "breed_count")
        .filter(Column::Species.eq(species))
        .group_by(Column::Breed)
        .order_by_desc(Expr::col(Column::Id).count())
        .into_model::<BreedCount>()
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Animals whose owners live in the given city, most viewed first.
pub async fn find_by_city(db: &DatabaseConnection, city: &str) -> Result<Vec<Model>, ModelError> {
    use sea_orm::JoinType;

    Entity::find()
        .join(JoinType::InnerJoin, Relation::User.def())
        .join(JoinType::InnerJoin, user::Relation::Address.def())
        .filter(crate::address::Column::City.eq(city))
        .order_by_desc(Column::Views)
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}
