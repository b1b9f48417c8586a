//! Create `animal_relation` table with FK to `animal`.
//!
//! Records which other animals or species an animal is friendly with.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AnimalRelation::Table)
                    .if_not_exists()
                    .col(uuid(AnimalRelation::Id).primary_key())
                    .col(uuid(AnimalRelation::AnimalId).not_null())
                    .col(string_len(AnimalRelation::FriendWith, 128).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_animal_relation_animal")
                            .from(AnimalRelation::Table, AnimalRelation::AnimalId)
                            .to(Animal::Table, Animal::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AnimalRelation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AnimalRelation { Table, Id, AnimalId, FriendWith }

#[derive(DeriveIden)]
enum Animal { Table, Id }
