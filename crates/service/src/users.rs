//! User-level reads used by the admin dashboard.

use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use models::{address, user};

use crate::animals::{self, AnimalWithChildren};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize)]
pub struct UserWithDetails {
    #[serde(flatten)]
    pub user: user::Model,
    pub address: Option<address::Model>,
    pub animals: Vec<AnimalWithChildren>,
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<user::Model>, ServiceError> {
    Ok(user::find_by_id(db, id).await?)
}

/// Every user with address and fully expanded animals. Admin-only; the
/// dashboard renders the whole tree at once.
pub async fn list_all_with_details(db: &DatabaseConnection) -> Result<Vec<UserWithDetails>, ServiceError> {
    use sea_orm::EntityTrait;
    let users = user::Entity::find()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut out = Vec::with_capacity(users.len());
    for u in users {
        let addr = address::find_by_user(db, u.id).await?;
        let animals = animals::with_children_for_user(db, u.id).await?;
        out.push(UserWithDetails { user: u, address: addr, animals });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn listing_includes_address_and_animals() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let u = models::user::create(
            &db,
            "Admin",
            "View",
            &format!("adminview_{}@example.com", Uuid::new_v4()),
            "0700",
        )
        .await?;
        models::address::create(&db, u.id, "Str. Universitatii 3", "Iasi", "IS", "700000", "RO").await?;
        models::animal::create(&db, u.id, "Bella", "Beagle", "Dog", 2, "female").await?;

        let all = list_all_with_details(&db).await?;
        let mine = all.iter().find(|d| d.user.id == u.id).expect("listed");
        assert!(mine.address.is_some());
        assert_eq!(mine.animals.len(), 1);

        let storage = crate::storage::MediaStorage::new(std::env::temp_dir());
        crate::purge::purge_user(&db, &storage, u.id).await?;
        Ok(())
    }
}
