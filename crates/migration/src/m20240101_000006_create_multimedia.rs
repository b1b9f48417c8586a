//! Create `multimedia` table with FK to `animal`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Multimedia::Table)
                    .if_not_exists()
                    .col(uuid(Multimedia::Id).primary_key())
                    .col(uuid(Multimedia::AnimalId).not_null())
                    .col(string_len(Multimedia::MediaType, 16).not_null())
                    .col(string_len(Multimedia::Url, 512).not_null())
                    .col(ColumnDef::new(Multimedia::MimeType).string_len(128).null())
                    .col(ColumnDef::new(Multimedia::Description).text().null())
                    .col(timestamp_with_time_zone(Multimedia::UploadDate).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_multimedia_animal")
                            .from(Multimedia::Table, Multimedia::AnimalId)
                            .to(Animal::Table, Animal::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Multimedia::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Multimedia { Table, Id, AnimalId, MediaType, Url, MimeType, Description, UploadDate }

#[derive(DeriveIden)]
enum Animal { Table, Id }
