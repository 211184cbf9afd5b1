use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderEvents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderEvents::OrderId).uuid().not_null())
                    .col(ColumnDef::new(OrderEvents::Status).string().not_null())
                    .col(ColumnDef::new(OrderEvents::Note).string())
                    .col(
                        ColumnDef::new(OrderEvents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(OrderEvents::Table, OrderEvents::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(OrderEvents::Table)
                    .col(OrderEvents::OrderId)
                    .name("idx_order_events_order_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderEvents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OrderEvents {
    Table,
    Id,
    OrderId,
    Status,
    Note,
    CreatedAt,
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
}
