//! Install the server-side `purge_animal` function.
//!
//! This is the atomic deletion path: all child-table deletes plus the
//! animal row itself run inside one implicit transaction. The application
//! falls back to per-table deletes when invoking it fails.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const CREATE_PURGE_ANIMAL: &str = r#"
CREATE OR REPLACE FUNCTION purge_animal(target uuid) RETURNS void AS $$
BEGIN
    DELETE FROM animal_relation WHERE animal_id = target;
    DELETE FROM multimedia WHERE animal_id = target;
    DELETE FROM feeding_schedule WHERE animal_id = target;
    DELETE FROM medical_history WHERE animal_id = target;
    DELETE FROM animal WHERE id = target;
END;
$$ LANGUAGE plpgsql;
"#;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(CREATE_PURGE_ANIMAL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP FUNCTION IF EXISTS purge_animal(uuid);")
            .await?;
        Ok(())
    }
}
