use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Animal: owner and species lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_animal_user")
                    .table(Animal::Table)
                    .col(Animal::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_animal_species")
                    .table(Animal::Table)
                    .col(Animal::Species)
                    .to_owned(),
            )
            .await?;

        // Child tables: animal_id scans drive both reads and the purge path
        manager
            .create_index(
                Index::create()
                    .name("idx_multimedia_animal")
                    .table(Multimedia::Table)
                    .col(Multimedia::AnimalId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_feeding_schedule_animal")
                    .table(FeedingSchedule::Table)
                    .col(FeedingSchedule::AnimalId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_medical_history_animal")
                    .table(MedicalHistory::Table)
                    .col(MedicalHistory::AnimalId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_animal_relation_animal")
                    .table(AnimalRelation::Table)
                    .col(AnimalRelation::AnimalId)
                    .to_owned(),
            )
            .await?;

        // Address: one lookup per user
        manager
            .create_index(
                Index::create()
                    .name("idx_address_user")
                    .table(Address::Table)
                    .col(Address::UserId)
                    .to_owned(),
            )
            .await?;

        // Messages: conversation scans and unread counters
        manager
            .create_index(
                Index::create()
                    .name("idx_message_sender_receiver")
                    .table(Message::Table)
                    .col(Message::SenderId)
                    .col(Message::ReceiverId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_message_receiver_read")
                    .table(Message::Table)
                    .col(Message::ReceiverId)
                    .col(Message::IsRead)
                    .to_owned(),
            )
            .await?;

        // Newsletter: composite unique (user_id, species) backs idempotent updates
        manager
            .create_index(
                Index::create()
                    .name("uniq_newsletter_user_species")
                    .table(Newsletter::Table)
                    .col(Newsletter::UserId)
                    .col(Newsletter::Species)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_animal_user").table(Animal::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_animal_species").table(Animal::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_multimedia_animal").table(Multimedia::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_feeding_schedule_animal").table(FeedingSchedule::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_medical_history_animal").table(MedicalHistory::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_animal_relation_animal").table(AnimalRelation::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_address_user").table(Address::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_message_sender_receiver").table(Message::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_message_receiver_read").table(Message::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_newsletter_user_species").table(Newsletter::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Animal { Table, UserId, Species }

#[derive(DeriveIden)]
enum Multimedia { Table, AnimalId }

#[derive(DeriveIden)]
enum FeedingSchedule { Table, AnimalId }

#[derive(DeriveIden)]
enum MedicalHistory { Table, AnimalId }

#[derive(DeriveIden)]
enum AnimalRelation { Table, AnimalId }

#[derive(DeriveIden)]
enum Address { Table, UserId }

#[derive(DeriveIden)]
enum Message { Table, SenderId, ReceiverId, IsRead }

#[derive(DeriveIden)]
enum Newsletter { Table, UserId, Species }
