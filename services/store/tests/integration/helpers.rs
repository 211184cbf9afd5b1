use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use frostline_domain::money::Money;
use frostline_domain::pagination::PageRequest;
use frostline_store::domain::repository::{
    DelayedTaskRepository, OrderRepository, PaymentGatewayPort, ProductRepository,
};
use frostline_store::domain::types::{
    DelayedTask, Order, OrderEvent, OrderItem, OrderStatus, Product, ProductPatch, ProductSortBy,
    generate_order_number,
};
use frostline_store::error::StoreServiceError;

// ── MockProductRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockProductRepo {
    pub products: Arc<Mutex<Vec<Product>>>,
}

impl MockProductRepo {
    pub fn with(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(Mutex::new(products)),
        }
    }
}

impl ProductRepository for MockProductRepo {
    async fn list(
        &self,
        brand: Option<&str>,
        _sort_by: ProductSortBy,
        _page: PageRequest,
    ) -> Result<Vec<Product>, StoreServiceError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| brand.is_none_or(|b| p.brand == b))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreServiceError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreServiceError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create(&self, product: &Product) -> Result<(), StoreServiceError> {
        self.products.lock().unwrap().push(product.clone());
        Ok(())
    }

    async fn update(&self, _id: Uuid, _patch: &ProductPatch) -> Result<(), StoreServiceError> {
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreServiceError> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }

    async fn count(&self) -> Result<u64, StoreServiceError> {
        Ok(self.products.lock().unwrap().len() as u64)
    }

    async fn insert_many(&self, items: &[Product]) -> Result<(), StoreServiceError> {
        self.products.lock().unwrap().extend(items.iter().cloned());
        Ok(())
    }
}

// ── MockOrderRepo ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockOrderRepo {
    pub orders: Arc<Mutex<Vec<Order>>>,
    pub items: Arc<Mutex<Vec<OrderItem>>>,
    pub events: Arc<Mutex<Vec<OrderEvent>>>,
    pub purged: Arc<Mutex<Vec<Uuid>>>,
    pub fail_purge: Arc<AtomicBool>,
}

impl MockOrderRepo {
    pub fn with(orders: Vec<Order>) -> Self {
        Self {
            orders: Arc::new(Mutex::new(orders)),
            ..Default::default()
        }
    }

    pub fn status_of(&self, id: Uuid) -> Option<OrderStatus> {
        self.orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.status)
    }
}

impl OrderRepository for MockOrderRepo {
    async fn create(
        &self,
        order: &Order,
        items: &[OrderItem],
        event: &OrderEvent,
    ) -> Result<(), StoreServiceError> {
        self.orders.lock().unwrap().push(order.clone());
        self.items.lock().unwrap().extend(items.iter().cloned());
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreServiceError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<Order>, StoreServiceError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list(
        &self,
        status: Option<OrderStatus>,
        _page: PageRequest,
    ) -> Result<Vec<Order>, StoreServiceError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .cloned()
            .collect())
    }

    async fn items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, StoreServiceError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn events(&self, order_id: Uuid) -> Result<Vec<OrderEvent>, StoreServiceError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn mark_paid(
        &self,
        id: Uuid,
        payment_id: &str,
        event: &OrderEvent,
    ) -> Result<bool, StoreServiceError> {
        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders
            .iter_mut()
            .find(|o| o.id == id && o.status == OrderStatus::Created)
        else {
            return Ok(false);
        };
        order.status = OrderStatus::Paid;
        order.payment_id = Some(payment_id.to_owned());
        order.paid_at = Some(Utc::now());
        drop(orders);
        self.events.lock().unwrap().push(event.clone());
        Ok(true)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
        event: &OrderEvent,
    ) -> Result<bool, StoreServiceError> {
        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders.iter_mut().find(|o| o.id == id && o.status == from) else {
            return Ok(false);
        };
        order.status = to;
        drop(orders);
        self.events.lock().unwrap().push(event.clone());
        Ok(true)
    }

    async fn purge(&self, order_id: Uuid) -> Result<(), StoreServiceError> {
        if self.fail_purge.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("simulated purge failure").into());
        }
        self.orders.lock().unwrap().retain(|o| o.id != order_id);
        self.items.lock().unwrap().retain(|i| i.order_id != order_id);
        self.events.lock().unwrap().retain(|e| e.order_id != order_id);
        self.purged.lock().unwrap().push(order_id);
        Ok(())
    }
}

// ── MockTaskRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockTaskRepo {
    pub tasks: Arc<Mutex<Vec<DelayedTask>>>,
}

impl MockTaskRepo {
    pub fn with(tasks: Vec<DelayedTask>) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(tasks)),
        }
    }
}

impl DelayedTaskRepository for MockTaskRepo {
    async fn enqueue(&self, task: &DelayedTask) -> Result<(), StoreServiceError> {
        self.tasks.lock().unwrap().push(task.clone());
        Ok(())
    }

    async fn due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<DelayedTask>, StoreServiceError> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| {
                t.due_at <= now
                    && t.claimed_at.is_none()
                    && t.completed_at.is_none()
                    && t.failed_at.is_none()
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn claim(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, StoreServiceError> {
        let mut tasks = self.tasks.lock().unwrap();
        let Some(task) = tasks
            .iter_mut()
            .find(|t| t.id == id && t.claimed_at.is_none())
        else {
            return Ok(false);
        };
        task.claimed_at = Some(now);
        Ok(true)
    }

    async fn mark_completed(&self, id: Uuid) -> Result<(), StoreServiceError> {
        if let Some(task) = self.tasks.lock().unwrap().iter_mut().find(|t| t.id == id) {
            task.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn retry_later(
        &self,
        id: Uuid,
        error: &str,
        due_at: DateTime<Utc>,
    ) -> Result<(), StoreServiceError> {
        if let Some(task) = self.tasks.lock().unwrap().iter_mut().find(|t| t.id == id) {
            task.attempts += 1;
            task.last_error = Some(error.to_owned());
            task.due_at = due_at;
            task.claimed_at = None;
        }
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), StoreServiceError> {
        if let Some(task) = self.tasks.lock().unwrap().iter_mut().find(|t| t.id == id) {
            task.attempts += 1;
            task.last_error = Some(error.to_owned());
            task.failed_at = Some(Utc::now());
        }
        Ok(())
    }
}

// ── MockGateway ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockGateway {
    pub verify_result: bool,
    pub created_orders: Arc<Mutex<Vec<(i64, String)>>>,
}

impl MockGateway {
    pub fn accepting() -> Self {
        Self {
            verify_result: true,
            created_orders: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            verify_result: false,
            created_orders: Arc::new(Mutex::new(vec![])),
        }
    }
}

impl PaymentGatewayPort for MockGateway {
    async fn create_gateway_order(
        &self,
        amount: Money,
        receipt: &str,
    ) -> Result<String, StoreServiceError> {
        self.created_orders
            .lock()
            .unwrap()
            .push((amount.cents(), receipt.to_owned()));
        Ok(format!("gw_{receipt}"))
    }

    async fn verify_payment(
        &self,
        _gateway_order_id: &str,
        _payment_id: &str,
        _signature: &str,
    ) -> Result<bool, StoreServiceError> {
        Ok(self.verify_result)
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_product(name: &str, price_major: i64) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::now_v7(),
        name: name.to_owned(),
        brand: "CoolWave".to_owned(),
        description: "test product".to_owned(),
        price: Money::from_major(price_major),
        images: vec![],
        specs: serde_json::json!({}),
        rating: 4.2,
        stock: 10,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_order(user_id: Uuid, status: OrderStatus) -> Order {
    let now = Utc::now();
    Order {
        id: Uuid::now_v7(),
        user_id,
        order_number: generate_order_number(),
        status,
        amount: Money::from_major(34_990),
        address: "12 Lakeview Road".to_owned(),
        gateway_order_id: Some("gw_test".to_owned()),
        payment_id: None,
        paid_at: None,
        created_at: now,
        updated_at: now,
    }
}
