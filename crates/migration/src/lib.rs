//! Migrator registering entity-specific migrations in dependency order.
//! The purge function and indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_user_credentials;
mod m20240101_000003_create_admins;
mod m20240101_000004_create_address;
mod m20240101_000005_create_animal;
mod m20240101_000006_create_multimedia;
mod m20240101_000007_create_feeding_schedule;
mod m20240101_000008_create_medical_history;
mod m20240101_000009_create_animal_relation;
mod m20240101_000010_create_message;
mod m20240101_000011_create_newsletter;
mod m20240101_000012_create_purge_function;
mod m20240101_000013_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_user_credentials::Migration),
            Box::new(m20240101_000003_create_admins::Migration),
            Box::new(m20240101_000004_create_address::Migration),
            Box::new(m20240101_000005_create_animal::Migration),
            Box::new(m20240101_000006_create_multimedia::Migration),
            Box::new(m20240101_000007_create_feeding_schedule::Migration),
            Box::new(m20240101_000008_create_medical_history::Migration),
            Box::new(m20240101_000009_create_animal_relation::Migration),
            Box::new(m20240101_000010_create_message::Migration),
            Box::new(m20240101_000011_create_newsletter::Migration),
            Box::new(m20240101_000012_create_purge_function::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000013_add_indexes::Migration),
        ]
    }
}
