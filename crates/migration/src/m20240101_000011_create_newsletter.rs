//! Create `newsletter` table with FK to `users`.
//!
//! One row per (user, species); deactivated rows are kept so resubscribing
//! flips `is_active` instead of inserting duplicates.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Newsletter::Table)
                    .if_not_exists()
                    .col(uuid(Newsletter::Id).primary_key())
                    .col(uuid(Newsletter::UserId).not_null())
                    .col(string_len(Newsletter::Species, 64).not_null())
                    .col(boolean(Newsletter::IsActive).not_null().default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_newsletter_user")
                            .from(Newsletter::Table, Newsletter::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Newsletter::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Newsletter { Table, Id, UserId, Species, IsActive }

#[derive(DeriveIden)]
enum Users { Table, Id }
