use sea_orm_migration::prelude::*;

mod m20260401_000001_create_products;
mod m20260401_000002_create_orders;
mod m20260401_000003_create_order_items;
mod m20260401_000004_create_order_events;
mod m20260401_000005_create_delayed_tasks;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_products::Migration),
            Box::new(m20260401_000002_create_orders::Migration),
            Box::new(m20260401_000003_create_order_items::Migration),
            Box::new(m20260401_000004_create_order_events::Migration),
            Box::new(m20260401_000005_create_delayed_tasks::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
