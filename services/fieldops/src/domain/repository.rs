#![allow(async_fn_in_trait)]

use uuid::Uuid;

use frostline_domain::money::{EarningsSplit, Money};
use frostline_domain::pagination::PageRequest;
use frostline_domain::user::UserRole;

use crate::domain::types::{
    Agent, AgentApplication, ApplicationStatus, PaymentMethod, RequestStatus, ServiceRequest, User,
};
use crate::error::FieldopsServiceError;

/// Repository for user profiles and the role read model.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, FieldopsServiceError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, FieldopsServiceError>;

    async fn create(&self, user: &User) -> Result<(), FieldopsServiceError>;

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<(), FieldopsServiceError>;

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, FieldopsServiceError>;

    /// Update the role read model. Returns `false` when the user is missing.
    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<bool, FieldopsServiceError>;
}

/// Repository for field agents.
pub trait AgentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, FieldopsServiceError>;

    async fn find_by_user_id(&self, user_id: Uuid)
    -> Result<Option<Agent>, FieldopsServiceError>;

    async fn list(
        &self,
        active_only: bool,
        page: PageRequest,
    ) -> Result<Vec<Agent>, FieldopsServiceError>;

    /// Bench or reactivate an agent. Returns `false` when the agent is missing.
    async fn set_active(&self, id: Uuid, active: bool) -> Result<bool, FieldopsServiceError>;
}

/// Repository for agent applications.
pub trait AgentApplicationRepository: Send + Sync {
    async fn create(&self, application: &AgentApplication) -> Result<(), FieldopsServiceError>;

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<AgentApplication>, FieldopsServiceError>;

    async fn list(
        &self,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Vec<AgentApplication>, FieldopsServiceError>;

    async fn has_pending(&self, user_id: Uuid) -> Result<bool, FieldopsServiceError>;

    /// Approve in one transaction: mark the application approved (guarded on
    /// it still being pending), insert the provisioned agent, and promote the
    /// user's role read model. Returns `false` when the guard failed.
    async fn approve(
        &self,
        id: Uuid,
        agent: &Agent,
    ) -> Result<bool, FieldopsServiceError>;

    /// Reject, guarded on pending. Returns `false` when the guard failed.
    async fn reject(&self, id: Uuid) -> Result<bool, FieldopsServiceError>;
}

/// Repository for service requests.
pub trait ServiceRequestRepository: Send + Sync {
    async fn create(&self, request: &ServiceRequest) -> Result<(), FieldopsServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ServiceRequest>, FieldopsServiceError>;

    async fn list(
        &self,
        status: Option<RequestStatus>,
        page: PageRequest,
    ) -> Result<Vec<ServiceRequest>, FieldopsServiceError>;

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<ServiceRequest>, FieldopsServiceError>;

    async fn list_by_agent(
        &self,
        agent_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<ServiceRequest>, FieldopsServiceError>;

    /// pending → assigned, guarded. Returns `false` when the request was no
    /// longer pending.
    async fn assign(&self, id: Uuid, agent_id: Uuid) -> Result<bool, FieldopsServiceError>;

    /// assigned → in_progress, guarded on status and the assigned agent.
    async fn start(&self, id: Uuid, agent_id: Uuid) -> Result<bool, FieldopsServiceError>;

    /// in_progress → completed in one transaction: writes the final price,
    /// payment method, and both split amounts on the request (guarded on
    /// status and the assigned agent) and atomically increments the agent's
    /// running totals. Returns `false` when the guard failed.
    async fn complete(
        &self,
        id: Uuid,
        agent_id: Uuid,
        final_price: Money,
        method: PaymentMethod,
        split: EarningsSplit,
    ) -> Result<bool, FieldopsServiceError>;

    /// pending → cancelled, guarded.
    async fn cancel(&self, id: Uuid) -> Result<bool, FieldopsServiceError>;

    /// pending → rejected, guarded.
    async fn reject(&self, id: Uuid) -> Result<bool, FieldopsServiceError>;
}
