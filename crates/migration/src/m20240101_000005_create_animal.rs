//! Create `animal` table with FK to `users`.
//!
//! No ON DELETE CASCADE: removal is handled by the purge orchestrator.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Animal::Table)
                    .if_not_exists()
                    .col(uuid(Animal::Id).primary_key())
                    .col(uuid(Animal::UserId).not_null())
                    .col(string_len(Animal::Name, 128).not_null())
                    .col(string_len(Animal::Breed, 128).not_null())
                    .col(string_len(Animal::Species, 64).not_null())
                    .col(integer(Animal::Age).not_null())
                    .col(string_len(Animal::Gender, 16).not_null())
                    .col(big_integer(Animal::Views).not_null().default(0))
                    .col(timestamp_with_time_zone(Animal::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_animal_user")
                            .from(Animal::Table, Animal::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Animal::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Animal { Table, Id, UserId, Name, Breed, Species, Age, Gender, Views, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
