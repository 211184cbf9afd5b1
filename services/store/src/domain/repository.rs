#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use frostline_domain::money::Money;
use frostline_domain::pagination::PageRequest;

use crate::domain::types::{
    DelayedTask, Order, OrderEvent, OrderItem, OrderStatus, Product, ProductPatch, ProductSortBy,
};
use crate::error::StoreServiceError;

/// Repository for catalog products.
pub trait ProductRepository: Send + Sync {
    async fn list(
        &self,
        brand: Option<&str>,
        sort_by: ProductSortBy,
        page: PageRequest,
    ) -> Result<Vec<Product>, StoreServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreServiceError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreServiceError>;

    async fn create(&self, product: &Product) -> Result<(), StoreServiceError>;

    async fn update(&self, id: Uuid, patch: &ProductPatch) -> Result<(), StoreServiceError>;

    /// Delete a product. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreServiceError>;

    async fn count(&self) -> Result<u64, StoreServiceError>;

    async fn insert_many(&self, products: &[Product]) -> Result<(), StoreServiceError>;
}

/// Repository for orders, their items, and the status timeline.
pub trait OrderRepository: Send + Sync {
    /// Insert the order, its items, and the initial timeline event in one
    /// transaction.
    async fn create(
        &self,
        order: &Order,
        items: &[OrderItem],
        event: &OrderEvent,
    ) -> Result<(), StoreServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreServiceError>;

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, StoreServiceError>;

    async fn list(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Vec<Order>, StoreServiceError>;

    async fn items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, StoreServiceError>;

    /// Timeline events, oldest first.
    async fn events(&self, order_id: Uuid) -> Result<Vec<OrderEvent>, StoreServiceError>;

    /// Record a verified payment and move the order to `paid`, guarded on the
    /// order still being `created`. Returns `false` when the guard failed.
    async fn mark_paid(
        &self,
        id: Uuid,
        payment_id: &str,
        event: &OrderEvent,
    ) -> Result<bool, StoreServiceError>;

    /// Guarded status transition plus its timeline event in one transaction.
    /// Returns `false` when the order was no longer in `from`.
    async fn transition(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
        event: &OrderEvent,
    ) -> Result<bool, StoreServiceError>;

    /// Delete the order together with its items and timeline. Idempotent.
    async fn purge(&self, order_id: Uuid) -> Result<(), StoreServiceError>;
}

/// Repository for the durable delayed-task queue.
pub trait DelayedTaskRepository: Send + Sync {
    async fn enqueue(&self, task: &DelayedTask) -> Result<(), StoreServiceError>;

    /// Due, unclaimed, unfinished tasks ordered by `due_at`.
    async fn due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<DelayedTask>, StoreServiceError>;

    /// Atomically claim a task. Returns `false` when another consumer got
    /// there first.
    async fn claim(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, StoreServiceError>;

    async fn mark_completed(&self, id: Uuid) -> Result<(), StoreServiceError>;

    /// Release the claim and re-arm the task for a later attempt.
    async fn retry_later(
        &self,
        id: Uuid,
        error: &str,
        due_at: DateTime<Utc>,
    ) -> Result<(), StoreServiceError>;

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), StoreServiceError>;
}

/// Port for the third-party checkout gateway. Verification is a pass-through
/// call; signatures are never checked locally.
pub trait PaymentGatewayPort: Send + Sync {
    async fn create_gateway_order(
        &self,
        amount: Money,
        receipt: &str,
    ) -> Result<String, StoreServiceError>;

    async fn verify_payment(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, StoreServiceError>;
}

/// Port for storing uploaded images. Returns the public relative URL.
pub trait ImageStore: Send + Sync {
    async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, StoreServiceError>;
}
