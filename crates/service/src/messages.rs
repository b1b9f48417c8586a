//! Direct messaging between adopters.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use models::{message, user};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize)]
pub struct ConversationMessage {
    #[serde(flatten)]
    pub message: message::Model,
    #[serde(rename = "senderName")]
    pub sender_name: String,
    #[serde(rename = "receiverName")]
    pub receiver_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    #[serde(rename = "otherUserId")]
    pub other_user_id: Uuid,
    #[serde(rename = "otherUserName")]
    pub other_user_name: String,
    #[serde(rename = "lastMessageTime")]
    pub last_message_time: chrono::DateTime<chrono::FixedOffset>,
    #[serde(rename = "unreadCount")]
    pub unread_count: u64,
}

fn full_name(u: &user::Model) -> String {
    format!("{} {}", u.first_name, u.last_name).trim().to_string()
}

async fn names_for(db: &DatabaseConnection, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, ServiceError> {
    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(ids.to_vec()))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(users.into_iter().map(|u| (u.id, full_name(&u))).collect())
}

#[instrument(skip(db, content))]
pub async fn send(
    db: &DatabaseConnection,
    sender_id: Uuid,
    receiver_id: Uuid,
    content: &str,
) -> Result<message::Model, ServiceError> {
    Ok(message::create(db, sender_id, receiver_id, content).await?)
}

/// Both directions with one other user, oldest first, names attached.
pub async fn conversation(
    db: &DatabaseConnection,
    user_id: Uuid,
    other_user_id: Uuid,
) -> Result<Vec<ConversationMessage>, ServiceError> {
    let messages = message::conversation_between(db, user_id, other_user_id).await?;
    let names = names_for(db, &[user_id, other_user_id]).await?;
    let unknown = || "Unknown user".to_string();
    Ok(messages
        .into_iter()
        .map(|m| {
            let sender_name = names.get(&m.sender_id).cloned().unwrap_or_else(unknown);
            let receiver_name = names.get(&m.receiver_id).cloned().unwrap_or_else(unknown);
            ConversationMessage { message: m, sender_name, receiver_name }
        })
        .collect())
}

/// One entry per correspondent: newest message first, with the count of
/// messages they sent that we have not read yet.
pub async fn conversations(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<ConversationSummary>, ServiceError> {
    let all = message::involving_user(db, user_id).await?;

    // `all` is newest-first, so the first sighting of a correspondent also
    // carries the conversation's last-message time.
    let mut order: Vec<Uuid> = Vec::new();
    let mut last_time: HashMap<Uuid, chrono::DateTime<chrono::FixedOffset>> = HashMap::new();
    let mut unread: HashMap<Uuid, u64> = HashMap::new();
    for m in &all {
        let other = if m.sender_id == user_id { m.receiver_id } else { m.sender_id };
        if !last_time.contains_key(&other) {
            order.push(other);
            last_time.insert(other, m.sent_at);
        }
        if m.receiver_id == user_id && !m.is_read {
            *unread.entry(other).or_insert(0) += 1;
        }
    }

    let names = names_for(db, &order).await?;
    Ok(order
        .into_iter()
        .map(|other| ConversationSummary {
            other_user_id: other,
            other_user_name: names.get(&other).cloned().unwrap_or_else(|| "Unknown user".to_string()),
            last_message_time: last_time[&other],
            unread_count: unread.get(&other).copied().unwrap_or(0),
        })
        .collect())
}

pub async fn mark_read(db: &DatabaseConnection, user_id: Uuid, other_user_id: Uuid) -> Result<u64, ServiceError> {
    Ok(message::mark_read(db, user_id, other_user_id).await?)
}

pub async fn unread_count(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, ServiceError> {
    Ok(message::count_unread(db, user_id).await?)
}
