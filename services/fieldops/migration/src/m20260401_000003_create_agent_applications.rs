use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AgentApplications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AgentApplications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AgentApplications::UserId).uuid().not_null())
                    .col(ColumnDef::new(AgentApplications::Name).string().not_null())
                    .col(ColumnDef::new(AgentApplications::Phone).string().not_null())
                    .col(
                        ColumnDef::new(AgentApplications::ServiceKinds)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentApplications::Latitude)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentApplications::Longitude)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentApplications::Status)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AgentApplications::DecidedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(AgentApplications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AgentApplications::Table, AgentApplications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Admin review queue filters on status.
        manager
            .create_index(
                Index::create()
                    .table(AgentApplications::Table)
                    .col(AgentApplications::Status)
                    .name("idx_agent_applications_status")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AgentApplications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AgentApplications {
    Table,
    Id,
    UserId,
    Name,
    Phone,
    ServiceKinds,
    Latitude,
    Longitude,
    Status,
    DecidedAt,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
