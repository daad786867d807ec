//! Indexes for the `task` table.
//!
//! - unique `title`, the storage-side guard for duplicate titles
//! - (`created_at`, `id`) for the newest/oldest listings
//! - `done` for the status filter
use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_task::Task;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_task_title_unique")
                    .table(Task::Table)
                    .col(Task::Title)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_task_created_at_id")
                    .table(Task::Table)
                    .col(Task::CreatedAt)
                    .col(Task::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_task_done")
                    .table(Task::Table)
                    .col(Task::Done)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_task_done", "idx_task_created_at_id", "idx_task_title_unique"] {
            manager
                .drop_index(Index::drop().name(name).table(Task::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}
