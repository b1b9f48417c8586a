use sea_orm::{entity::prelude::*, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "newsletter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub species: String,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn active_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsActive.eq(true))
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Deactivate every subscription the user holds; returns affected rows.
pub async fn deactivate_all(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
        .filter(Column::UserId.eq(user_id))
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}

/// Activate a (user, species) subscription, inserting the row on first use.
/// Re-running with the same species set is a no-op, which is what keeps the
/// newsletter update endpoint idempotent.
pub async fn upsert_active(db: &DatabaseConnection, user_id: Uuid, species: &str) -> Result<Model, ModelError> {
    if species.trim().is_empty() {
        return Err(ModelError::Validation("species required".into()));
    }
    if let Some(existing) = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::Species.eq(species))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
    {
        let mut am: ActiveModel = existing.into();
        am.is_active = Set(true);
        am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
    } else {
        let am = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            species: Set(species.to_string()),
            is_active: Set(true),
        };
        am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
    }
}

/// Users with an active subscription for the species, joined for dispatch.
pub async fn active_subscribers_by_species(
    db: &DatabaseConnection,
    species: &str,
) -> Result<Vec<user::Model>, ModelError> {
    let rows = Entity::find()
        .filter(Column::Species.eq(species))
        .filter(Column::IsActive.eq(true))
        .find_also_related(user::Entity)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(rows.into_iter().filter_map(|(_, u)| u).collect())
}

/// Purge-path helper: drop all subscription rows for the user.
pub async fn delete_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::UserId.eq(user_id))
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
