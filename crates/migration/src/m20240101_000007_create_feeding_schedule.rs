//! Create `feeding_schedule` table with FK to `animal`.
//!
//! Feeding times are stored as a JSON array of "HH:MM" strings.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeedingSchedule::Table)
                    .if_not_exists()
                    .col(uuid(FeedingSchedule::Id).primary_key())
                    .col(uuid(FeedingSchedule::AnimalId).not_null())
                    .col(json_binary(FeedingSchedule::FeedingTimes).not_null())
                    .col(string_len(FeedingSchedule::FoodType, 128).not_null())
                    .col(ColumnDef::new(FeedingSchedule::Notes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feeding_schedule_animal")
                            .from(FeedingSchedule::Table, FeedingSchedule::AnimalId)
                            .to(Animal::Table, Animal::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FeedingSchedule::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum FeedingSchedule { Table, Id, AnimalId, FeedingTimes, FoodType, Notes }

#[derive(DeriveIden)]
enum Animal { Table, Id }
