use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceRequests::UserId).uuid().not_null())
                    .col(ColumnDef::new(ServiceRequests::Kind).string().not_null())
                    .col(ColumnDef::new(ServiceRequests::Address).string().not_null())
                    .col(ColumnDef::new(ServiceRequests::Description).string())
                    .col(ColumnDef::new(ServiceRequests::Status).string().not_null())
                    .col(ColumnDef::new(ServiceRequests::AgentId).uuid())
                    .col(
                        ColumnDef::new(ServiceRequests::EstimatedPriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceRequests::FinalPriceCents).big_integer())
                    .col(ColumnDef::new(ServiceRequests::PaymentMethod).string())
                    .col(ColumnDef::new(ServiceRequests::AgentAmountCents).big_integer())
                    .col(ColumnDef::new(ServiceRequests::PlatformAmountCents).big_integer())
                    .col(
                        ColumnDef::new(ServiceRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ServiceRequests::Table, ServiceRequests::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ServiceRequests::Table, ServiceRequests::AgentId)
                            .to(Agents::Table, Agents::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::UserId)
                    .name("idx_service_requests_user_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::AgentId)
                    .name("idx_service_requests_agent_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::Status)
                    .name("idx_service_requests_status")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ServiceRequests {
    Table,
    Id,
    UserId,
    Kind,
    Address,
    Description,
    Status,
    AgentId,
    EstimatedPriceCents,
    FinalPriceCents,
    PaymentMethod,
    AgentAmountCents,
    PlatformAmountCents,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Agents {
    Table,
    Id,
}
