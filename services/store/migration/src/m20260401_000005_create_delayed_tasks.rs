use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DelayedTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DelayedTasks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DelayedTasks::Kind).string().not_null())
                    .col(
                        ColumnDef::new(DelayedTasks::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DelayedTasks::DueAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DelayedTasks::ClaimedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(DelayedTasks::CompletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(DelayedTasks::FailedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(DelayedTasks::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(DelayedTasks::LastError).string())
                    .col(
                        ColumnDef::new(DelayedTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for consumer poll queries (due, unclaimed, by due_at).
        manager
            .create_index(
                Index::create()
                    .table(DelayedTasks::Table)
                    .col(DelayedTasks::DueAt)
                    .name("idx_delayed_tasks_due_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DelayedTasks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DelayedTasks {
    Table,
    Id,
    Kind,
    Payload,
    DueAt,
    ClaimedAt,
    CompletedAt,
    FailedAt,
    Attempts,
    LastError,
    CreatedAt,
}
