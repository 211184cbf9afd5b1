use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use frostline_domain::money::Money;
use frostline_domain::pagination::Sort;

/// Catalog product.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub price: Money,
    pub images: Vec<String>,
    pub specs: serde_json::Value,
    pub rating: f32,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial product update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub images: Option<Vec<String>>,
    pub specs: Option<serde_json::Value>,
    pub rating: Option<f32>,
    pub stock: Option<i32>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.brand.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.images.is_none()
            && self.specs.is_none()
            && self.rating.is_none()
            && self.stock.is_none()
    }
}

/// Order status lifecycle.
///
/// The fulfilment chain is created → paid → confirmed → shipping →
/// out_for_delivery → success; `cancelled` is reachable only through the
/// cancel operation while the order has not shipped. Transitions never move
/// backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Created,
    Paid,
    Confirmed,
    Shipping,
    OutForDelivery,
    Success,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Paid => "paid",
            Self::Confirmed => "confirmed",
            Self::Shipping => "shipping",
            Self::OutForDelivery => "out_for_delivery",
            Self::Success => "success",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(Self::Created),
            "paid" => Some(Self::Paid),
            "confirmed" => Some(Self::Confirmed),
            "shipping" => Some(Self::Shipping),
            "out_for_delivery" => Some(Self::OutForDelivery),
            "success" => Some(Self::Success),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Position in the fulfilment chain; `None` for `cancelled`.
    fn chain_index(self) -> Option<u8> {
        match self {
            Self::Created => Some(0),
            Self::Paid => Some(1),
            Self::Confirmed => Some(2),
            Self::Shipping => Some(3),
            Self::OutForDelivery => Some(4),
            Self::Success => Some(5),
            Self::Cancelled => None,
        }
    }

    /// A forward move along the fulfilment chain. Cancellation is not an
    /// "advance" and is guarded separately by [`Self::can_cancel`].
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        match (self.chain_index(), next.chain_index()) {
            (Some(cur), Some(next)) => next > cur,
            _ => false,
        }
    }

    /// Customer cancellation is allowed until the order ships.
    pub fn can_cancel(self) -> bool {
        matches!(self, Self::Created | Self::Paid | Self::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Cancelled)
    }
}

/// Customer order header.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub amount: Money,
    pub address: String,
    pub gateway_order_id: Option<String>,
    pub payment_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order line item with a price snapshot taken at order time.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i32,
}

/// Status timeline entry.
#[derive(Debug, Clone)]
pub struct OrderEvent {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderEvent {
    pub fn now(order_id: Uuid, status: OrderStatus, note: Option<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            order_id,
            status,
            note,
            created_at: Utc::now(),
        }
    }
}

/// Task kind for purging a successful order after the configured delay.
pub const TASK_PURGE_ORDER: &str = "purge_order";

/// Payload of a [`TASK_PURGE_ORDER`] task.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct PurgeOrderPayload {
    pub order_id: Uuid,
}

/// Durable delayed task processed by the cleanup consumer.
#[derive(Debug, Clone)]
pub struct DelayedTask {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub due_at: DateTime<Utc>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DelayedTask {
    pub fn purge_order(order_id: Uuid, due_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: TASK_PURGE_ORDER.to_owned(),
            payload: serde_json::json!(PurgeOrderPayload { order_id }),
            due_at,
            claimed_at: None,
            completed_at: None,
            failed_at: None,
            attempts: 0,
            last_error: None,
            created_at: Utc::now(),
        }
    }
}

/// Sort options for the public product listing.
#[derive(Debug, Clone, Copy)]
pub enum ProductSortBy {
    Price(Sort),
    Rating(Sort),
    Random,
}

impl Default for ProductSortBy {
    fn default() -> Self {
        Self::Rating(Sort::Desc)
    }
}

impl ProductSortBy {
    pub fn from_kebab_case(s: &str) -> Option<Self> {
        match s {
            "price-asc" => Some(Self::Price(Sort::Asc)),
            "price-desc" => Some(Self::Price(Sort::Desc)),
            "rating-desc" => Some(Self::Rating(Sort::Desc)),
            "random" => Some(Self::Random),
            _ => None,
        }
    }
}

/// Human-readable order number, e.g. `FR-9K2X41ZQ7B`.
pub fn generate_order_number() -> String {
    use rand::distr::{Alphanumeric, SampleString};
    let suffix = Alphanumeric
        .sample_string(&mut rand::rng(), 10)
        .to_ascii_uppercase();
    format!("FR-{suffix}")
}
