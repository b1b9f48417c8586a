//! Create `medical_history` table with FK to `animal`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MedicalHistory::Table)
                    .if_not_exists()
                    .col(uuid(MedicalHistory::Id).primary_key())
                    .col(uuid(MedicalHistory::AnimalId).not_null())
                    .col(string_len(MedicalHistory::VetNumber, 64).not_null())
                    .col(timestamp_with_time_zone(MedicalHistory::RecordDate).not_null())
                    .col(ColumnDef::new(MedicalHistory::Description).text().null())
                    .col(boolean(MedicalHistory::FirstAidNoted).not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medical_history_animal")
                            .from(MedicalHistory::Table, MedicalHistory::AnimalId)
                            .to(Animal::Table, Animal::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MedicalHistory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum MedicalHistory { Table, Id, AnimalId, VetNumber, RecordDate, Description, FirstAidNoted }

#[derive(DeriveIden)]
enum Animal { Table, Id }
