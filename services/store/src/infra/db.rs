use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;

use frostline_core::sea_ext::OrderByRandom;
use frostline_domain::money::Money;
use frostline_domain::pagination::{PageRequest, Sort};
use frostline_store_schema::{delayed_tasks, order_events, order_items, orders, products};

use crate::domain::repository::{DelayedTaskRepository, OrderRepository, ProductRepository};
use crate::domain::types::{
    DelayedTask, Order, OrderEvent, OrderItem, OrderStatus, Product, ProductPatch, ProductSortBy,
};
use crate::error::StoreServiceError;

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

impl ProductRepository for DbProductRepository {
    async fn list(
        &self,
        brand: Option<&str>,
        sort_by: ProductSortBy,
        page: PageRequest,
    ) -> Result<Vec<Product>, StoreServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let mut query = products::Entity::find();
        if let Some(brand) = brand {
            query = query.filter(products::Column::Brand.eq(brand));
        }
        query = match sort_by {
            ProductSortBy::Price(Sort::Asc) => query.order_by_asc(products::Column::PriceCents),
            ProductSortBy::Price(Sort::Desc) => query.order_by_desc(products::Column::PriceCents),
            ProductSortBy::Rating(Sort::Asc) => query.order_by_asc(products::Column::Rating),
            ProductSortBy::Rating(Sort::Desc) => query.order_by_desc(products::Column::Rating),
            ProductSortBy::Random => query.order_by_random(),
        };
        let models = query
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreServiceError> {
        let model = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find product by id")?;
        Ok(model.map(product_from_model))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreServiceError> {
        let models = products::Entity::find()
            .filter(products::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find products by ids")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn create(&self, product: &Product) -> Result<(), StoreServiceError> {
        product_to_active_model(product)
            .insert(&self.db)
            .await
            .context("create product")?;
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &ProductPatch) -> Result<(), StoreServiceError> {
        let mut am = products::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(ref name) = patch.name {
            am.name = Set(name.clone());
        }
        if let Some(ref brand) = patch.brand {
            am.brand = Set(brand.clone());
        }
        if let Some(ref description) = patch.description {
            am.description = Set(description.clone());
        }
        if let Some(price) = patch.price {
            am.price_cents = Set(price.cents());
        }
        if let Some(ref images) = patch.images {
            am.images = Set(serde_json::json!(images));
        }
        if let Some(ref specs) = patch.specs {
            am.specs = Set(specs.clone());
        }
        if let Some(rating) = patch.rating {
            am.rating = Set(rating);
        }
        if let Some(stock) = patch.stock {
            am.stock = Set(stock);
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db).await.context("update product")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreServiceError> {
        let result = products::Entity::delete_many()
            .filter(products::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete product")?;
        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> Result<u64, StoreServiceError> {
        let count = products::Entity::find()
            .count(&self.db)
            .await
            .context("count products")?;
        Ok(count)
    }

    async fn insert_many(&self, items: &[Product]) -> Result<(), StoreServiceError> {
        if items.is_empty() {
            return Ok(());
        }
        let models = items.iter().map(product_to_active_model);
        products::Entity::insert_many(models)
            .exec_without_returning(&self.db)
            .await
            .context("insert products")?;
        Ok(())
    }
}

fn product_from_model(model: products::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        brand: model.brand,
        description: model.description,
        price: Money::from_cents(model.price_cents),
        images: serde_json::from_value(model.images).unwrap_or_default(),
        specs: model.specs,
        rating: model.rating,
        stock: model.stock,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn product_to_active_model(product: &Product) -> products::ActiveModel {
    products::ActiveModel {
        id: Set(product.id),
        name: Set(product.name.clone()),
        brand: Set(product.brand.clone()),
        description: Set(product.description.clone()),
        price_cents: Set(product.price.cents()),
        images: Set(serde_json::json!(product.images)),
        specs: Set(product.specs.clone()),
        rating: Set(product.rating),
        stock: Set(product.stock),
        created_at: Set(product.created_at),
        updated_at: Set(product.updated_at),
    }
}

// ── Order repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn create(
        &self,
        order: &Order,
        items: &[OrderItem],
        event: &OrderEvent,
    ) -> Result<(), StoreServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let order = order.clone();
                let items = items.to_vec();
                let event = event.clone();
                Box::pin(async move {
                    orders::ActiveModel {
                        id: Set(order.id),
                        user_id: Set(order.user_id),
                        order_number: Set(order.order_number.clone()),
                        status: Set(order.status.as_str().to_owned()),
                        amount_cents: Set(order.amount.cents()),
                        address: Set(order.address.clone()),
                        gateway_order_id: Set(order.gateway_order_id.clone()),
                        payment_id: Set(None),
                        paid_at: Set(None),
                        created_at: Set(order.created_at),
                        updated_at: Set(order.updated_at),
                    }
                    .insert(txn)
                    .await?;

                    for item in &items {
                        order_items::ActiveModel {
                            id: Set(item.id),
                            order_id: Set(item.order_id),
                            product_id: Set(item.product_id),
                            product_name: Set(item.product_name.clone()),
                            unit_price_cents: Set(item.unit_price.cents()),
                            quantity: Set(item.quantity),
                        }
                        .insert(txn)
                        .await?;
                    }

                    insert_order_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("create order with items")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreServiceError> {
        let model = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order by id")?;
        model.map(order_from_model).transpose()
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, StoreServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let models = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list orders by user")?;
        models.into_iter().map(order_from_model).collect()
    }

    async fn list(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Vec<Order>, StoreServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let mut query = orders::Entity::find();
        if let Some(status) = status {
            query = query.filter(orders::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(orders::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list orders")?;
        models.into_iter().map(order_from_model).collect()
    }

    async fn items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, StoreServiceError> {
        let models = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order_id))
            .all(&self.db)
            .await
            .context("list order items")?;
        Ok(models.into_iter().map(order_item_from_model).collect())
    }

    async fn events(&self, order_id: Uuid) -> Result<Vec<OrderEvent>, StoreServiceError> {
        let models = order_events::Entity::find()
            .filter(order_events::Column::OrderId.eq(order_id))
            .order_by_asc(order_events::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list order events")?;
        models.into_iter().map(order_event_from_model).collect()
    }

    async fn mark_paid(
        &self,
        id: Uuid,
        payment_id: &str,
        event: &OrderEvent,
    ) -> Result<bool, StoreServiceError> {
        let updated = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                let payment_id = payment_id.to_owned();
                let event = event.clone();
                Box::pin(async move {
                    let now = Utc::now();
                    let result = orders::Entity::update_many()
                        .col_expr(
                            orders::Column::Status,
                            Expr::value(OrderStatus::Paid.as_str()),
                        )
                        .col_expr(orders::Column::PaymentId, Expr::value(Some(payment_id)))
                        .col_expr(orders::Column::PaidAt, Expr::value(Some(now)))
                        .col_expr(orders::Column::UpdatedAt, Expr::value(now))
                        .filter(orders::Column::Id.eq(id))
                        .filter(orders::Column::Status.eq(OrderStatus::Created.as_str()))
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(false);
                    }
                    insert_order_event(txn, &event).await?;
                    Ok(true)
                })
            })
            .await
            .context("mark order paid")?;
        Ok(updated)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
        event: &OrderEvent,
    ) -> Result<bool, StoreServiceError> {
        let updated = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                let event = event.clone();
                Box::pin(async move {
                    let result = orders::Entity::update_many()
                        .col_expr(orders::Column::Status, Expr::value(to.as_str()))
                        .col_expr(orders::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(orders::Column::Id.eq(id))
                        .filter(orders::Column::Status.eq(from.as_str()))
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(false);
                    }
                    insert_order_event(txn, &event).await?;
                    Ok(true)
                })
            })
            .await
            .context("transition order status")?;
        Ok(updated)
    }

    async fn purge(&self, order_id: Uuid) -> Result<(), StoreServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    order_events::Entity::delete_many()
                        .filter(order_events::Column::OrderId.eq(order_id))
                        .exec(txn)
                        .await?;
                    order_items::Entity::delete_many()
                        .filter(order_items::Column::OrderId.eq(order_id))
                        .exec(txn)
                        .await?;
                    orders::Entity::delete_many()
                        .filter(orders::Column::Id.eq(order_id))
                        .exec(txn)
                        .await?;
                    Ok(())
                })
            })
            .await
            .context("purge order")?;
        Ok(())
    }
}

async fn insert_order_event(
    txn: &DatabaseTransaction,
    event: &OrderEvent,
) -> Result<(), sea_orm::DbErr> {
    order_events::ActiveModel {
        id: Set(event.id),
        order_id: Set(event.order_id),
        status: Set(event.status.as_str().to_owned()),
        note: Set(event.note.clone()),
        created_at: Set(event.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn order_from_model(model: orders::Model) -> Result<Order, StoreServiceError> {
    let status = OrderStatus::parse(&model.status)
        .ok_or_else(|| anyhow::anyhow!("unknown order status {:?}", model.status))?;
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        order_number: model.order_number,
        status,
        amount: Money::from_cents(model.amount_cents),
        address: model.address,
        gateway_order_id: model.gateway_order_id,
        payment_id: model.payment_id,
        paid_at: model.paid_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn order_item_from_model(model: order_items::Model) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        product_name: model.product_name,
        unit_price: Money::from_cents(model.unit_price_cents),
        quantity: model.quantity,
    }
}

fn order_event_from_model(model: order_events::Model) -> Result<OrderEvent, StoreServiceError> {
    let status = OrderStatus::parse(&model.status)
        .ok_or_else(|| anyhow::anyhow!("unknown order status {:?}", model.status))?;
    Ok(OrderEvent {
        id: model.id,
        order_id: model.order_id,
        status,
        note: model.note,
        created_at: model.created_at,
    })
}

// ── Delayed task repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDelayedTaskRepository {
    pub db: DatabaseConnection,
}

impl DelayedTaskRepository for DbDelayedTaskRepository {
    async fn enqueue(&self, task: &DelayedTask) -> Result<(), StoreServiceError> {
        delayed_tasks::ActiveModel {
            id: Set(task.id),
            kind: Set(task.kind.clone()),
            payload: Set(task.payload.clone()),
            due_at: Set(task.due_at),
            claimed_at: Set(None),
            completed_at: Set(None),
            failed_at: Set(None),
            attempts: Set(task.attempts),
            last_error: Set(None),
            created_at: Set(task.created_at),
        }
        .insert(&self.db)
        .await
        .context("enqueue delayed task")?;
        Ok(())
    }

    async fn due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<DelayedTask>, StoreServiceError> {
        let models = delayed_tasks::Entity::find()
            .filter(delayed_tasks::Column::DueAt.lte(now))
            .filter(delayed_tasks::Column::ClaimedAt.is_null())
            .filter(delayed_tasks::Column::CompletedAt.is_null())
            .filter(delayed_tasks::Column::FailedAt.is_null())
            .order_by_asc(delayed_tasks::Column::DueAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list due delayed tasks")?;
        Ok(models.into_iter().map(delayed_task_from_model).collect())
    }

    async fn claim(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, StoreServiceError> {
        // The `claimed_at IS NULL` guard makes the claim atomic: with two
        // racing consumers only one update affects a row.
        let result = delayed_tasks::Entity::update_many()
            .col_expr(delayed_tasks::Column::ClaimedAt, Expr::value(Some(now)))
            .filter(delayed_tasks::Column::Id.eq(id))
            .filter(delayed_tasks::Column::ClaimedAt.is_null())
            .exec(&self.db)
            .await
            .context("claim delayed task")?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_completed(&self, id: Uuid) -> Result<(), StoreServiceError> {
        delayed_tasks::ActiveModel {
            id: Set(id),
            completed_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark delayed task completed")?;
        Ok(())
    }

    async fn retry_later(
        &self,
        id: Uuid,
        error: &str,
        due_at: DateTime<Utc>,
    ) -> Result<(), StoreServiceError> {
        delayed_tasks::Entity::update_many()
            .col_expr(
                delayed_tasks::Column::Attempts,
                Expr::col(delayed_tasks::Column::Attempts).add(1),
            )
            .col_expr(
                delayed_tasks::Column::LastError,
                Expr::value(Some(error.to_owned())),
            )
            .col_expr(delayed_tasks::Column::DueAt, Expr::value(due_at))
            .col_expr(
                delayed_tasks::Column::ClaimedAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .filter(delayed_tasks::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("retry delayed task later")?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), StoreServiceError> {
        delayed_tasks::Entity::update_many()
            .col_expr(
                delayed_tasks::Column::Attempts,
                Expr::col(delayed_tasks::Column::Attempts).add(1),
            )
            .col_expr(
                delayed_tasks::Column::LastError,
                Expr::value(Some(error.to_owned())),
            )
            .col_expr(
                delayed_tasks::Column::FailedAt,
                Expr::value(Some(Utc::now())),
            )
            .filter(delayed_tasks::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("mark delayed task failed")?;
        Ok(())
    }
}

fn delayed_task_from_model(model: delayed_tasks::Model) -> DelayedTask {
    DelayedTask {
        id: model.id,
        kind: model.kind,
        payload: model.payload,
        due_at: model.due_at,
        claimed_at: model.claimed_at,
        completed_at: model.completed_at,
        failed_at: model.failed_at,
        attempts: model.attempts,
        last_error: model.last_error,
        created_at: model.created_at,
    }
}
