//! Migrator for the task store.
//! Indexes are applied after the table they cover.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_task;
mod m20240101_000002_add_task_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_task::Migration),
            Box::new(m20240101_000002_add_task_indexes::Migration),
        ]
    }
}
