//! Cascading deletion of aggregate roots (animals and users).
//!
//! Two explicit strategies:
//! - `Procedure`: a single `purge_animal(uuid)` call; the database function
//!   removes the child rows and the root inside one transaction.
//! - `PerTable`: the fallback taken whenever the procedure call fails.
//!   Each child table is deleted independently; a failure is recorded in
//!   the report and does not stop the remaining deletes or the root delete.
//!
//! Root non-existence is not an error here; callers check existence before
//! invoking the orchestrator.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::MediaStorage;

/// Which deletion path ended up running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PurgeStrategy {
    Procedure,
    PerTable,
}

/// Outcome of one child-table delete on the fallback path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TableOutcome {
    /// Rows removed (possibly zero).
    Deleted(u64),
    /// The delete failed; the error is kept for the report, not re-raised.
    Failed(String),
    /// Not individually touched (procedure path handles children atomically).
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub table: &'static str,
    pub outcome: TableOutcome,
}

/// Per-animal purge result. `root_deleted` alone decides what callers
/// report; the table outcomes exist so operators can tell a clean purge
/// from a partial one.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeReport {
    pub strategy: PurgeStrategy,
    pub tables: Vec<TableReport>,
    pub root_deleted: bool,
}

impl PurgeReport {
    /// True when no child-table delete failed.
    pub fn fully_clean(&self) -> bool {
        self.root_deleted
            && self
                .tables
                .iter()
                .all(|t| !matches!(t.outcome, TableOutcome::Failed(_)))
    }
}

/// User purge result: the recursive animal fan-out plus the user's own
/// dependent tables.
#[derive(Debug, Clone, Serialize)]
pub struct UserPurgeReport {
    pub animals: Vec<(Uuid, PurgeReport)>,
    pub tables: Vec<TableReport>,
    pub root_deleted: bool,
}

impl UserPurgeReport {
    pub fn fully_clean(&self) -> bool {
        self.root_deleted
            && self.animals.iter().all(|(_, r)| r.fully_clean())
            && self
                .tables
                .iter()
                .all(|t| !matches!(t.outcome, TableOutcome::Failed(_)))
    }
}

const ANIMAL_CHILD_TABLES: [&str; 4] =
    ["animal_relation", "multimedia", "feeding_schedule", "medical_history"];

/// Delete an animal and everything that references it.
///
/// Prefers the atomic database function; on any error falls back to
/// best-effort per-table deletes. The fallback also removes multimedia
/// files from disk (file removal failures are logged, never fatal).
pub async fn purge_animal(
    db: &DatabaseConnection,
    storage: &MediaStorage,
    animal_id: Uuid,
) -> Result<PurgeReport, ServiceError> {
    match call_purge_procedure(db, animal_id).await {
        Ok(()) => {
            info!(%animal_id, "animal purged via procedure");
            let tables = ANIMAL_CHILD_TABLES
                .iter()
                .map(|&t| TableReport { table: t, outcome: TableOutcome::Skipped })
                .collect();
            Ok(PurgeReport { strategy: PurgeStrategy::Procedure, tables, root_deleted: true })
        }
        Err(err) => {
            warn!(%animal_id, error = %err, "purge procedure failed, falling back to per-table deletes");
            purge_animal_per_table(db, storage, animal_id).await
        }
    }
}

async fn call_purge_procedure(db: &DatabaseConnection, animal_id: Uuid) -> Result<(), ServiceError> {
    db.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT purge_animal($1)",
        [animal_id.into()],
    ))
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

async fn purge_animal_per_table(
    db: &DatabaseConnection,
    storage: &MediaStorage,
    animal_id: Uuid,
) -> Result<PurgeReport, ServiceError> {
    let mut tables = Vec::with_capacity(ANIMAL_CHILD_TABLES.len());

    tables.push(TableReport {
        table: "animal_relation",
        outcome: outcome_of(models::animal_relation::delete_by_animal(db, animal_id).await, animal_id, "animal_relation"),
    });

    // Multimedia rows reference files on disk; collect the urls first so the
    // files can be unlinked after the rows are gone.
    let media_urls: Vec<String> = match models::multimedia::find_by_animal(db, animal_id).await {
        Ok(records) => records.into_iter().map(|m| m.url).collect(),
        Err(e) => {
            warn!(%animal_id, error = %e, "could not list multimedia before delete; files may be orphaned");
            Vec::new()
        }
    };
    let multimedia_outcome = outcome_of(models::multimedia::delete_by_animal(db, animal_id).await, animal_id, "multimedia");
    if matches!(multimedia_outcome, TableOutcome::Deleted(_)) {
        for url in &media_urls {
            if !storage.remove_url(url).await {
                warn!(%animal_id, %url, "could not delete media file");
            }
        }
    }
    tables.push(TableReport { table: "multimedia", outcome: multimedia_outcome });

    tables.push(TableReport {
        table: "feeding_schedule",
        outcome: outcome_of(models::feeding_schedule::delete_by_animal(db, animal_id).await, animal_id, "feeding_schedule"),
    });
    tables.push(TableReport {
        table: "medical_history",
        outcome: outcome_of(models::medical_history::delete_by_animal(db, animal_id).await, animal_id, "medical_history"),
    });

    // The root delete is the one step that is allowed to fail the purge.
    let removed = models::animal::hard_delete(db, animal_id).await?;
    let report = PurgeReport {
        strategy: PurgeStrategy::PerTable,
        tables,
        root_deleted: removed > 0,
    };
    if !report.fully_clean() {
        warn!(%animal_id, report = ?report, "animal purge finished with partial cleanup");
    }
    Ok(report)
}

/// Delete a user, their animals (through [`purge_animal`]), address,
/// messages and newsletter subscriptions.
pub async fn purge_user(
    db: &DatabaseConnection,
    storage: &MediaStorage,
    user_id: Uuid,
) -> Result<UserPurgeReport, ServiceError> {
    let owned = models::animal::find_by_user(db, user_id).await?;
    let mut animals = Vec::with_capacity(owned.len());
    for animal in owned {
        let report = purge_animal(db, storage, animal.id).await?;
        animals.push((animal.id, report));
    }

    let mut tables = Vec::with_capacity(3);
    tables.push(TableReport {
        table: "address",
        outcome: outcome_of(models::address::delete_by_user(db, user_id).await, user_id, "address"),
    });
    tables.push(TableReport {
        table: "message",
        outcome: outcome_of(models::message::delete_involving_user(db, user_id).await, user_id, "message"),
    });
    tables.push(TableReport {
        table: "newsletter",
        outcome: outcome_of(models::newsletter::delete_by_user(db, user_id).await, user_id, "newsletter"),
    });

    let removed = models::user::hard_delete(db, user_id).await?;
    let report = UserPurgeReport { animals, tables, root_deleted: removed > 0 };
    if report.fully_clean() {
        info!(%user_id, "user purged");
    } else {
        warn!(%user_id, report = ?report, "user purge finished with partial cleanup");
    }
    Ok(report)
}

fn outcome_of(res: Result<u64, models::errors::ModelError>, root: Uuid, table: &str) -> TableOutcome {
    match res {
        Ok(n) => TableOutcome::Deleted(n),
        Err(e) => {
            error!(%root, table, error = %e, "dependent-table delete failed");
            TableOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MediaStorage;
    use crate::test_support::get_db;

    fn storage() -> MediaStorage {
        MediaStorage::new(std::env::temp_dir().join("pet_adoption_purge_tests"))
    }

    fn unique_email(prefix: &str) -> String {
        format!("{}_{}@example.com", prefix, Uuid::new_v4())
    }

    #[test]
    fn report_flags_partial_cleanup() {
        let report = PurgeReport {
            strategy: PurgeStrategy::PerTable,
            tables: vec![
                TableReport { table: "multimedia", outcome: TableOutcome::Deleted(2) },
                TableReport { table: "feeding_schedule", outcome: TableOutcome::Failed("boom".into()) },
            ],
            root_deleted: true,
        };
        assert!(!report.fully_clean());
        assert!(report.root_deleted);
    }

    #[test]
    fn procedure_report_marks_children_skipped() {
        let tables: Vec<TableReport> = ANIMAL_CHILD_TABLES
            .iter()
            .map(|&t| TableReport { table: t, outcome: TableOutcome::Skipped })
            .collect();
        let report = PurgeReport { strategy: PurgeStrategy::Procedure, tables, root_deleted: true };
        assert!(report.fully_clean());
        assert_eq!(report.tables.len(), 4);
    }

    #[tokio::test]
    async fn purge_animal_removes_all_child_rows() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let owner = models::user::create(&db, "Purge", "Owner", &unique_email("purge_a"), "0700").await?;
        let a = models::animal::create(&db, owner.id, "Rex", "Labrador", "Dog", 4, "male").await?;
        models::animal_relation::create(&db, a.id, "Cats").await?;
        models::feeding_schedule::create(&db, a.id, &["08:00".to_string()], "kibble", None).await?;
        models::medical_history::create(&db, a.id, "VET-1", chrono::Utc::now().into(), None, false).await?;
        models::multimedia::create(&db, a.id, "photo", "/server/photo/ghost.jpg", Some("image/jpeg".into()), None).await?;

        let report = purge_animal(&db, &storage(), a.id).await?;
        assert!(report.root_deleted);

        assert!(!models::animal::exists(&db, a.id).await?);
        assert!(models::animal_relation::find_by_animal(&db, a.id).await?.is_empty());
        assert!(models::multimedia::find_by_animal(&db, a.id).await?.is_empty());
        assert!(models::feeding_schedule::find_by_animal(&db, a.id).await?.is_empty());
        assert!(models::medical_history::find_by_animal(&db, a.id).await?.is_empty());

        models::user::hard_delete(&db, owner.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn per_table_fallback_removes_all_child_rows() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let owner = models::user::create(&db, "Fallback", "Owner", &unique_email("purge_pt"), "0703").await?;
        let a = models::animal::create(&db, owner.id, "Luna", "Husky", "Dog", 2, "female").await?;
        models::animal_relation::create(&db, a.id, "Dogs").await?;
        models::feeding_schedule::create(&db, a.id, &["07:30".to_string()], "kibble", None).await?;
        models::multimedia::create(&db, a.id, "photo", "/server/photo/missing.jpg", Some("image/jpeg".into()), None).await?;

        let report = purge_animal_per_table(&db, &storage(), a.id).await?;
        assert_eq!(report.strategy, PurgeStrategy::PerTable);
        assert!(report.root_deleted);
        assert!(report.fully_clean());
        // per-table outcomes carry real row counts on this path
        let deleted: u64 = report
            .tables
            .iter()
            .map(|t| match &t.outcome {
                TableOutcome::Deleted(n) => *n,
                _ => 0,
            })
            .sum();
        assert_eq!(deleted, 3);

        assert!(!models::animal::exists(&db, a.id).await?);
        assert!(models::multimedia::find_by_animal(&db, a.id).await?.is_empty());

        models::user::hard_delete(&db, owner.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn purge_user_fans_out_to_animals_and_messages() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let u = models::user::create(&db, "Fanout", "User", &unique_email("purge_u"), "0701").await?;
        let friend = models::user::create(&db, "Friend", "User", &unique_email("purge_f"), "0702").await?;
        models::address::create(&db, u.id, "Main St 1", "Cluj", "CJ", "400000", "RO").await?;
        let a1 = models::animal::create(&db, u.id, "Rex", "Labrador", "Dog", 4, "male").await?;
        let a2 = models::animal::create(&db, u.id, "Pix", "Siamese", "Cat", 2, "female").await?;
        models::multimedia::create(&db, a1.id, "photo", "/server/photo/none.jpg", Some("image/jpeg".into()), None).await?;
        models::message::create(&db, u.id, friend.id, "hello").await?;
        models::message::create(&db, friend.id, u.id, "hi back").await?;
        models::newsletter::upsert_active(&db, u.id, "Dog").await?;

        let report = purge_user(&db, &storage(), u.id).await?;
        assert!(report.root_deleted);
        assert_eq!(report.animals.len(), 2);

        assert!(models::user::find_by_id(&db, u.id).await?.is_none());
        assert!(!models::animal::exists(&db, a1.id).await?);
        assert!(!models::animal::exists(&db, a2.id).await?);
        assert!(models::address::find_by_user(&db, u.id).await?.is_none());
        assert_eq!(models::message::involving_user(&db, friend.id).await?.len(), 0);
        assert!(models::newsletter::active_by_user(&db, u.id).await?.is_empty());

        models::user::hard_delete(&db, friend.id).await?;
        Ok(())
    }
}
