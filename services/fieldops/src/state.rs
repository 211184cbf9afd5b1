use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAgentApplicationRepository, DbAgentRepository, DbServiceRequestRepository, DbUserRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn agent_repo(&self) -> DbAgentRepository {
        DbAgentRepository {
            db: self.db.clone(),
        }
    }

    pub fn application_repo(&self) -> DbAgentApplicationRepository {
        DbAgentApplicationRepository {
            db: self.db.clone(),
        }
    }

    pub fn request_repo(&self) -> DbServiceRequestRepository {
        DbServiceRequestRepository {
            db: self.db.clone(),
        }
    }
}
