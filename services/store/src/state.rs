use sea_orm::DatabaseConnection;

use crate::infra::db::{DbDelayedTaskRepository, DbOrderRepository, DbProductRepository};
use crate::infra::payment::HttpPaymentGateway;
use crate::infra::storage::LocalImageStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub gateway: HttpPaymentGateway,
    pub images: LocalImageStore,
    pub purge_delay: chrono::Duration,
    pub upload_max_bytes: usize,
}

impl AppState {
    pub fn product_repo(&self) -> DbProductRepository {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn task_repo(&self) -> DbDelayedTaskRepository {
        DbDelayedTaskRepository {
            db: self.db.clone(),
        }
    }

    pub fn payment_gateway(&self) -> HttpPaymentGateway {
        self.gateway.clone()
    }

    pub fn image_store(&self) -> LocalImageStore {
        self.images.clone()
    }
}
