use sea_orm::{
    entity::prelude::*, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub is_read: bool,
    pub sent_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Sender,
    Receiver,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Sender => Entity::belongs_to(user::Entity)
                .from(Column::SenderId)
                .to(user::Column::Id)
                .into(),
            Relation::Receiver => Entity::belongs_to(user::Entity)
                .from(Column::ReceiverId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    sender_id: Uuid,
    receiver_id: Uuid,
    content: &str,
) -> Result<Model, ModelError> {
    if content.trim().is_empty() {
        return Err(ModelError::Validation("message content required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        sender_id: Set(sender_id),
        receiver_id: Set(receiver_id),
        content: Set(content.to_string()),
        is_read: Set(false),
        sent_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Both directions of a two-party conversation, oldest first.
pub async fn conversation_between(
    db: &DatabaseConnection,
    user_id: Uuid,
    other_user_id: Uuid,
) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(Column::SenderId.eq(user_id))
                        .add(Column::ReceiverId.eq(other_user_id)),
                )
                .add(
                    Condition::all()
                        .add(Column::SenderId.eq(other_user_id))
                        .add(Column::ReceiverId.eq(user_id)),
                ),
        )
        .order_by_asc(Column::SentAt)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Every message the user has sent or received, newest first.
pub async fn involving_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(
            Condition::any()
                .add(Column::SenderId.eq(user_id))
                .add(Column::ReceiverId.eq(user_id)),
        )
        .order_by_desc(Column::SentAt)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Flag everything the other party sent us as read; returns affected rows.
pub async fn mark_read(
    db: &DatabaseConnection,
    receiver_id: Uuid,
    sender_id: Uuid,
) -> Result<u64, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
        .filter(Column::SenderId.eq(sender_id))
        .filter(Column::ReceiverId.eq(receiver_id))
        .filter(Column::IsRead.eq(false))
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}

pub async fn count_unread(db: &DatabaseConnection, receiver_id: Uuid) -> Result<u64, ModelError> {
    Entity::find()
        .filter(Column::ReceiverId.eq(receiver_id))
        .filter(Column::IsRead.eq(false))
        .count(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Purge-path helper: remove every message the user participates in.
pub async fn delete_involving_user(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, ModelError> {
    let res = Entity::delete_many()
        .filter(
            Condition::any()
                .add(Column::SenderId.eq(user_id))
                .add(Column::ReceiverId.eq(user_id)),
        )
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
