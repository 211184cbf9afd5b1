//! SeaORM entities owned by the store service.

pub mod delayed_tasks;
pub mod order_events;
pub mod order_items;
pub mod orders;
pub mod products;
