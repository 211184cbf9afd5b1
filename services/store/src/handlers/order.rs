use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use frostline_auth_types::identity::IdentityHeaders;
use frostline_auth_types::policy::require_admin;

use crate::domain::types::{Order, OrderEvent, OrderItem, OrderStatus};
use crate::error::StoreServiceError;
use crate::state::AppState;
use crate::usecase::order::{
    AdvanceOrderStatusUseCase, CancelOrderUseCase, ConfirmPaymentInput, ConfirmPaymentUseCase,
    CreateOrderInput, CreateOrderUseCase, GetOrderUseCase, GetTimelineUseCase, ListMyOrdersUseCase,
    ListOrdersUseCase, OrderItemInput,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub order_number: String,
    pub status: &'static str,
    pub amount_cents: i64,
    pub address: String,
    pub gateway_order_id: Option<String>,
    pub payment_id: Option<String>,
    pub paid_at: Option<String>,
    #[serde(serialize_with = "frostline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_string(),
            order_number: order.order_number,
            status: order.status.as_str(),
            amount_cents: order.amount.cents(),
            address: order.address,
            gateway_order_id: order.gateway_order_id,
            payment_id: order.payment_id,
            paid_at: order
                .paid_at
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            created_at: order.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            product_name: item.product_name,
            unit_price_cents: item.unit_price.cents(),
            quantity: item.quantity,
        }
    }
}

#[derive(Serialize)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Serialize)]
pub struct OrderEventResponse {
    pub status: &'static str,
    pub note: Option<String>,
    #[serde(serialize_with = "frostline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<OrderEvent> for OrderEventResponse {
    fn from(event: OrderEvent) -> Self {
        Self {
            status: event.status.as_str(),
            note: event.note,
            created_at: event.created_at,
        }
    }
}

// ── POST /orders ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateOrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<CreateOrderItemRequest>,
    pub address: String,
}

pub async fn create_order(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), StoreServiceError> {
    let usecase = CreateOrderUseCase {
        orders: state.order_repo(),
        products: state.product_repo(),
        gateway: state.payment_gateway(),
    };
    let order = usecase
        .execute(
            identity.user_id,
            CreateOrderInput {
                items: body
                    .items
                    .into_iter()
                    .map(|i| OrderItemInput {
                        product_id: i.product_id,
                        quantity: i.quantity,
                    })
                    .collect(),
                address: body.address,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

// ── POST /orders/{id}/payment ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ConfirmPaymentRequest {
    pub payment_id: String,
    pub signature: String,
}

pub async fn confirm_payment(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ConfirmPaymentRequest>,
) -> Result<StatusCode, StoreServiceError> {
    let usecase = ConfirmPaymentUseCase {
        orders: state.order_repo(),
        gateway: state.payment_gateway(),
    };
    usecase
        .execute(
            identity.user_id,
            id,
            ConfirmPaymentInput {
                payment_id: body.payment_id,
                signature: body.signature,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /orders/@me ──────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct OrderListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub status: Option<String>,
}

fn page_from(query: &OrderListQuery) -> frostline_domain::pagination::PageRequest {
    frostline_domain::pagination::PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    }
}

pub async fn list_my_orders(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<OrderResponse>>, StoreServiceError> {
    let usecase = ListMyOrdersUseCase {
        orders: state.order_repo(),
    };
    let orders = usecase.execute(identity.user_id, page_from(&query)).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

// ── GET /orders ──────────────────────────────────────────────────────────────

pub async fn list_orders(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<OrderResponse>>, StoreServiceError> {
    require_admin(&identity).map_err(|_| StoreServiceError::Forbidden)?;
    let status = match query.status.as_deref() {
        Some(s) => Some(OrderStatus::parse(s).ok_or(StoreServiceError::InvalidStatus)?),
        None => None,
    };
    let usecase = ListOrdersUseCase {
        orders: state.order_repo(),
    };
    let orders = usecase.execute(status, page_from(&query)).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

// ── GET /orders/{id} ─────────────────────────────────────────────────────────

pub async fn get_order(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetailResponse>, StoreServiceError> {
    let usecase = GetOrderUseCase {
        orders: state.order_repo(),
    };
    let is_admin = require_admin(&identity).is_ok();
    let (order, items) = usecase.execute(identity.user_id, is_admin, id).await?;
    Ok(Json(OrderDetailResponse {
        order: order.into(),
        items: items.into_iter().map(OrderItemResponse::from).collect(),
    }))
}

// ── GET /orders/{id}/timeline ────────────────────────────────────────────────

pub async fn get_timeline(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<OrderEventResponse>>, StoreServiceError> {
    let usecase = GetTimelineUseCase {
        orders: state.order_repo(),
    };
    let is_admin = require_admin(&identity).is_ok();
    let events = usecase.execute(identity.user_id, is_admin, id).await?;
    Ok(Json(events.into_iter().map(OrderEventResponse::from).collect()))
}

// ── PATCH /orders/{id}/status ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AdvanceStatusRequest {
    pub status: String,
}

pub async fn advance_status(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AdvanceStatusRequest>,
) -> Result<StatusCode, StoreServiceError> {
    require_admin(&identity).map_err(|_| StoreServiceError::Forbidden)?;
    let next = OrderStatus::parse(&body.status).ok_or(StoreServiceError::InvalidStatus)?;
    let usecase = AdvanceOrderStatusUseCase {
        orders: state.order_repo(),
        tasks: state.task_repo(),
        purge_delay: state.purge_delay,
    };
    usecase.execute(id, next).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /orders/{id}/cancel ─────────────────────────────────────────────────

pub async fn cancel_order(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StoreServiceError> {
    let usecase = CancelOrderUseCase {
        orders: state.order_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
