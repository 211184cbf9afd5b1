use chrono::Utc;
use uuid::Uuid;

use frostline_domain::money::Money;
use frostline_store::domain::types::OrderStatus;
use frostline_store::error::StoreServiceError;
use frostline_store::usecase::order::{
    AdvanceOrderStatusUseCase, CancelOrderUseCase, ConfirmPaymentInput, ConfirmPaymentUseCase,
    CreateOrderInput, CreateOrderUseCase, OrderItemInput,
};

use crate::helpers::{MockGateway, MockOrderRepo, MockProductRepo, MockTaskRepo, test_order, test_product};

// ── CreateOrderUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_order_with_server_side_prices() {
    let split_ac = test_product("CoolWave Inverter Split 1.5T", 34_990);
    let window_ac = test_product("CoolWave Window 1T", 22_490);
    let products = MockProductRepo::with(vec![split_ac.clone(), window_ac.clone()]);
    let orders = MockOrderRepo::default();
    let gateway = MockGateway::accepting();

    let usecase = CreateOrderUseCase {
        orders: orders.clone(),
        products,
        gateway: gateway.clone(),
    };

    let order = usecase
        .execute(
            Uuid::now_v7(),
            CreateOrderInput {
                items: vec![
                    OrderItemInput {
                        product_id: split_ac.id,
                        quantity: 2,
                    },
                    OrderItemInput {
                        product_id: window_ac.id,
                        quantity: 1,
                    },
                ],
                address: "12 Lakeview Road".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.amount, Money::from_major(2 * 34_990 + 22_490));
    assert!(order.order_number.starts_with("FR-"));
    assert_eq!(
        order.gateway_order_id.as_deref(),
        Some(format!("gw_{}", order.order_number).as_str())
    );

    // Gateway saw the server-side total, not anything client-supplied.
    let registered = gateway.created_orders.lock().unwrap();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].0, Money::from_major(92_470).cents());

    // Initial timeline event recorded.
    let events = orders.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].status, OrderStatus::Created);
}

#[tokio::test]
async fn should_reject_order_without_items() {
    let usecase = CreateOrderUseCase {
        orders: MockOrderRepo::default(),
        products: MockProductRepo::default(),
        gateway: MockGateway::accepting(),
    };
    let result = usecase
        .execute(
            Uuid::now_v7(),
            CreateOrderInput {
                items: vec![],
                address: "12 Lakeview Road".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(StoreServiceError::EmptyOrder)));
}

#[tokio::test]
async fn should_reject_order_with_unknown_product() {
    let usecase = CreateOrderUseCase {
        orders: MockOrderRepo::default(),
        products: MockProductRepo::default(),
        gateway: MockGateway::accepting(),
    };
    let result = usecase
        .execute(
            Uuid::now_v7(),
            CreateOrderInput {
                items: vec![OrderItemInput {
                    product_id: Uuid::now_v7(),
                    quantity: 1,
                }],
                address: "12 Lakeview Road".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(StoreServiceError::ProductNotFound)));
}

#[tokio::test]
async fn should_reject_order_with_non_positive_quantity() {
    let product = test_product("CoolWave Window 1T", 22_490);
    let usecase = CreateOrderUseCase {
        orders: MockOrderRepo::default(),
        products: MockProductRepo::with(vec![product.clone()]),
        gateway: MockGateway::accepting(),
    };
    let result = usecase
        .execute(
            Uuid::now_v7(),
            CreateOrderInput {
                items: vec![OrderItemInput {
                    product_id: product.id,
                    quantity: 0,
                }],
                address: "12 Lakeview Road".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(StoreServiceError::InvalidQuantity)));
}

// ── ConfirmPaymentUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_mark_order_paid_when_gateway_accepts_signature() {
    let user_id = Uuid::now_v7();
    let order = test_order(user_id, OrderStatus::Created);
    let orders = MockOrderRepo::with(vec![order.clone()]);

    let usecase = ConfirmPaymentUseCase {
        orders: orders.clone(),
        gateway: MockGateway::accepting(),
    };
    usecase
        .execute(
            user_id,
            order.id,
            ConfirmPaymentInput {
                payment_id: "pay_123".into(),
                signature: "sig".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(orders.status_of(order.id), Some(OrderStatus::Paid));
    let stored = orders.orders.lock().unwrap();
    assert_eq!(stored[0].payment_id.as_deref(), Some("pay_123"));
}

#[tokio::test]
async fn should_leave_order_created_when_signature_rejected() {
    let user_id = Uuid::now_v7();
    let order = test_order(user_id, OrderStatus::Created);
    let orders = MockOrderRepo::with(vec![order.clone()]);

    let usecase = ConfirmPaymentUseCase {
        orders: orders.clone(),
        gateway: MockGateway::rejecting(),
    };
    let result = usecase
        .execute(
            user_id,
            order.id,
            ConfirmPaymentInput {
                payment_id: "pay_123".into(),
                signature: "bad".into(),
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(StoreServiceError::PaymentVerificationFailed)
    ));
    assert_eq!(orders.status_of(order.id), Some(OrderStatus::Created));
}

#[tokio::test]
async fn should_reject_double_payment_confirmation() {
    let user_id = Uuid::now_v7();
    let order = test_order(user_id, OrderStatus::Paid);
    let usecase = ConfirmPaymentUseCase {
        orders: MockOrderRepo::with(vec![order.clone()]),
        gateway: MockGateway::accepting(),
    };
    let result = usecase
        .execute(
            user_id,
            order.id,
            ConfirmPaymentInput {
                payment_id: "pay_456".into(),
                signature: "sig".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(StoreServiceError::AlreadyPaid)));
}

#[tokio::test]
async fn should_forbid_payment_confirmation_by_other_user() {
    let order = test_order(Uuid::now_v7(), OrderStatus::Created);
    let usecase = ConfirmPaymentUseCase {
        orders: MockOrderRepo::with(vec![order.clone()]),
        gateway: MockGateway::accepting(),
    };
    let result = usecase
        .execute(
            Uuid::now_v7(), // different user
            order.id,
            ConfirmPaymentInput {
                payment_id: "pay_123".into(),
                signature: "sig".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(StoreServiceError::Forbidden)));
}

// ── AdvanceOrderStatusUseCase ────────────────────────────────────────────────

#[tokio::test]
async fn should_advance_along_the_chain_and_record_events() {
    let order = test_order(Uuid::now_v7(), OrderStatus::Paid);
    let orders = MockOrderRepo::with(vec![order.clone()]);
    let tasks = MockTaskRepo::default();
    let usecase = AdvanceOrderStatusUseCase {
        orders: orders.clone(),
        tasks: tasks.clone(),
        purge_delay: chrono::Duration::minutes(10),
    };

    for next in [
        OrderStatus::Confirmed,
        OrderStatus::Shipping,
        OrderStatus::OutForDelivery,
    ] {
        usecase.execute(order.id, next).await.unwrap();
        assert_eq!(orders.status_of(order.id), Some(next));
    }

    let events = orders.events.lock().unwrap();
    assert_eq!(events.len(), 3);
    // No purge task until the order reaches success.
    assert!(tasks.tasks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_never_move_status_backward() {
    let order = test_order(Uuid::now_v7(), OrderStatus::Shipping);
    let orders = MockOrderRepo::with(vec![order.clone()]);
    let usecase = AdvanceOrderStatusUseCase {
        orders: orders.clone(),
        tasks: MockTaskRepo::default(),
        purge_delay: chrono::Duration::minutes(10),
    };

    for backward in [OrderStatus::Created, OrderStatus::Paid, OrderStatus::Confirmed] {
        let result = usecase.execute(order.id, backward).await;
        assert!(
            matches!(result, Err(StoreServiceError::InvalidTransition)),
            "expected InvalidTransition moving back to {backward:?}"
        );
    }
    assert_eq!(orders.status_of(order.id), Some(OrderStatus::Shipping));
}

#[tokio::test]
async fn should_enqueue_purge_task_when_order_succeeds() {
    let order = test_order(Uuid::now_v7(), OrderStatus::OutForDelivery);
    let orders = MockOrderRepo::with(vec![order.clone()]);
    let tasks = MockTaskRepo::default();
    let delay = chrono::Duration::minutes(10);
    let usecase = AdvanceOrderStatusUseCase {
        orders,
        tasks: tasks.clone(),
        purge_delay: delay,
    };

    let before = Utc::now();
    usecase.execute(order.id, OrderStatus::Success).await.unwrap();

    let queued = tasks.tasks.lock().unwrap();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].kind, "purge_order");
    assert!(queued[0].due_at >= before + delay);
    assert!(queued[0].due_at <= Utc::now() + delay);
}

// ── CancelOrderUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_cancel_order_before_shipping() {
    let user_id = Uuid::now_v7();
    let order = test_order(user_id, OrderStatus::Confirmed);
    let orders = MockOrderRepo::with(vec![order.clone()]);
    let usecase = CancelOrderUseCase {
        orders: orders.clone(),
    };

    usecase.execute(user_id, order.id).await.unwrap();
    assert_eq!(orders.status_of(order.id), Some(OrderStatus::Cancelled));
}

#[tokio::test]
async fn should_not_cancel_shipped_order() {
    let user_id = Uuid::now_v7();
    let order = test_order(user_id, OrderStatus::Shipping);
    let usecase = CancelOrderUseCase {
        orders: MockOrderRepo::with(vec![order.clone()]),
    };
    let result = usecase.execute(user_id, order.id).await;
    assert!(matches!(result, Err(StoreServiceError::InvalidTransition)));
}

#[tokio::test]
async fn should_forbid_cancelling_someone_elses_order() {
    let order = test_order(Uuid::now_v7(), OrderStatus::Created);
    let usecase = CancelOrderUseCase {
        orders: MockOrderRepo::with(vec![order.clone()]),
    };
    let result = usecase.execute(Uuid::now_v7(), order.id).await;
    assert!(matches!(result, Err(StoreServiceError::Forbidden)));
}
