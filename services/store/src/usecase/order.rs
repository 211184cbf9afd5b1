use chrono::Utc;
use uuid::Uuid;

use frostline_domain::money::Money;
use frostline_domain::pagination::PageRequest;

use crate::domain::repository::{
    DelayedTaskRepository, OrderRepository, PaymentGatewayPort, ProductRepository,
};
use crate::domain::types::{
    DelayedTask, Order, OrderEvent, OrderItem, OrderStatus, generate_order_number,
};
use crate::error::StoreServiceError;

// ── CreateOrder ──────────────────────────────────────────────────────────────

pub struct OrderItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

pub struct CreateOrderInput {
    pub items: Vec<OrderItemInput>,
    pub address: String,
}

pub struct CreateOrderUseCase<O, P, G>
where
    O: OrderRepository,
    P: ProductRepository,
    G: PaymentGatewayPort,
{
    pub orders: O,
    pub products: P,
    pub gateway: G,
}

impl<O, P, G> CreateOrderUseCase<O, P, G>
where
    O: OrderRepository,
    P: ProductRepository,
    G: PaymentGatewayPort,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CreateOrderInput,
    ) -> Result<Order, StoreServiceError> {
        if input.items.is_empty() {
            return Err(StoreServiceError::EmptyOrder);
        }
        if input.address.trim().is_empty() {
            return Err(StoreServiceError::MissingData);
        }
        if input.items.iter().any(|i| i.quantity <= 0) {
            return Err(StoreServiceError::InvalidQuantity);
        }

        let ids: Vec<Uuid> = input.items.iter().map(|i| i.product_id).collect();
        let products = self.products.find_by_ids(&ids).await?;

        let order_id = Uuid::now_v7();
        let mut items = Vec::with_capacity(input.items.len());
        let mut total = Money::ZERO;
        for item in &input.items {
            // Prices are resolved server-side at order time; the snapshot on
            // the line item is what the customer pays.
            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .ok_or(StoreServiceError::ProductNotFound)?;
            let line = product
                .price
                .checked_mul(item.quantity as i64)
                .ok_or(StoreServiceError::InvalidPrice)?;
            total = total
                .checked_add(line)
                .ok_or(StoreServiceError::InvalidPrice)?;
            items.push(OrderItem {
                id: Uuid::now_v7(),
                order_id,
                product_id: product.id,
                product_name: product.name.clone(),
                unit_price: product.price,
                quantity: item.quantity,
            });
        }

        let order_number = generate_order_number();
        let gateway_order_id = self
            .gateway
            .create_gateway_order(total, &order_number)
            .await?;

        let now = Utc::now();
        let order = Order {
            id: order_id,
            user_id,
            order_number,
            status: OrderStatus::Created,
            amount: total,
            address: input.address,
            gateway_order_id: Some(gateway_order_id),
            payment_id: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        };
        let event = OrderEvent::now(order_id, OrderStatus::Created, Some("order placed".into()));
        self.orders.create(&order, &items, &event).await?;
        Ok(order)
    }
}

// ── ConfirmPayment ───────────────────────────────────────────────────────────

pub struct ConfirmPaymentInput {
    pub payment_id: String,
    pub signature: String,
}

pub struct ConfirmPaymentUseCase<O: OrderRepository, G: PaymentGatewayPort> {
    pub orders: O,
    pub gateway: G,
}

impl<O: OrderRepository, G: PaymentGatewayPort> ConfirmPaymentUseCase<O, G> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        order_id: Uuid,
        input: ConfirmPaymentInput,
    ) -> Result<(), StoreServiceError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(StoreServiceError::OrderNotFound)?;
        if order.user_id != user_id {
            return Err(StoreServiceError::Forbidden);
        }
        match order.status {
            OrderStatus::Created => {}
            OrderStatus::Paid => return Err(StoreServiceError::AlreadyPaid),
            _ => return Err(StoreServiceError::InvalidTransition),
        }
        let gateway_order_id = order
            .gateway_order_id
            .as_deref()
            .ok_or(StoreServiceError::MissingData)?;

        let valid = self
            .gateway
            .verify_payment(gateway_order_id, &input.payment_id, &input.signature)
            .await?;
        if !valid {
            return Err(StoreServiceError::PaymentVerificationFailed);
        }

        let event = OrderEvent::now(order_id, OrderStatus::Paid, Some("payment verified".into()));
        if !self
            .orders
            .mark_paid(order_id, &input.payment_id, &event)
            .await?
        {
            // Lost a race with another confirmation.
            return Err(StoreServiceError::AlreadyPaid);
        }
        Ok(())
    }
}

// ── GetOrder / listings ──────────────────────────────────────────────────────

pub struct GetOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> GetOrderUseCase<O> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        is_admin: bool,
        order_id: Uuid,
    ) -> Result<(Order, Vec<OrderItem>), StoreServiceError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(StoreServiceError::OrderNotFound)?;
        if !is_admin && order.user_id != user_id {
            return Err(StoreServiceError::Forbidden);
        }
        let items = self.orders.items(order_id).await?;
        Ok((order, items))
    }
}

pub struct ListMyOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ListMyOrdersUseCase<O> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, StoreServiceError> {
        self.orders.list_by_user(user_id, page).await
    }
}

pub struct ListOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ListOrdersUseCase<O> {
    pub async fn execute(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Vec<Order>, StoreServiceError> {
        self.orders.list(status, page).await
    }
}

pub struct GetTimelineUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> GetTimelineUseCase<O> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        is_admin: bool,
        order_id: Uuid,
    ) -> Result<Vec<OrderEvent>, StoreServiceError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(StoreServiceError::OrderNotFound)?;
        if !is_admin && order.user_id != user_id {
            return Err(StoreServiceError::Forbidden);
        }
        self.orders.events(order_id).await
    }
}

// ── AdvanceOrderStatus ───────────────────────────────────────────────────────

pub struct AdvanceOrderStatusUseCase<O: OrderRepository, T: DelayedTaskRepository> {
    pub orders: O,
    pub tasks: T,
    pub purge_delay: chrono::Duration,
}

impl<O: OrderRepository, T: DelayedTaskRepository> AdvanceOrderStatusUseCase<O, T> {
    pub async fn execute(&self, order_id: Uuid, next: OrderStatus) -> Result<(), StoreServiceError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(StoreServiceError::OrderNotFound)?;
        if !order.status.can_advance_to(next) {
            return Err(StoreServiceError::InvalidTransition);
        }
        let event = OrderEvent::now(order_id, next, None);
        if !self
            .orders
            .transition(order_id, order.status, next, &event)
            .await?
        {
            // The order moved concurrently; the caller sees a conflict.
            return Err(StoreServiceError::InvalidTransition);
        }
        if next == OrderStatus::Success {
            let task = DelayedTask::purge_order(order_id, Utc::now() + self.purge_delay);
            self.tasks.enqueue(&task).await?;
        }
        Ok(())
    }
}

// ── CancelOrder ──────────────────────────────────────────────────────────────

pub struct CancelOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> CancelOrderUseCase<O> {
    pub async fn execute(&self, user_id: Uuid, order_id: Uuid) -> Result<(), StoreServiceError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(StoreServiceError::OrderNotFound)?;
        if order.user_id != user_id {
            return Err(StoreServiceError::Forbidden);
        }
        if !order.status.can_cancel() {
            return Err(StoreServiceError::InvalidTransition);
        }
        let event = OrderEvent::now(
            order_id,
            OrderStatus::Cancelled,
            Some("cancelled by customer".into()),
        );
        if !self
            .orders
            .transition(order_id, order.status, OrderStatus::Cancelled, &event)
            .await?
        {
            return Err(StoreServiceError::InvalidTransition);
        }
        Ok(())
    }
}
