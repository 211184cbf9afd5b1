use chrono::Utc;
use uuid::Uuid;

use frostline_domain::money::{EarningsSplit, Money};
use frostline_domain::pagination::PageRequest;

use crate::domain::repository::{AgentRepository, ServiceRequestRepository};
use crate::domain::types::{
    Agent, PaymentMethod, RequestStatus, ServiceKind, ServiceRequest,
};
use crate::error::FieldopsServiceError;

// ── CreateRequest ────────────────────────────────────────────────────────────

pub struct CreateRequestInput {
    pub kind: ServiceKind,
    pub address: String,
    pub description: Option<String>,
    pub estimated_price: Money,
}

pub struct CreateRequestUseCase<R: ServiceRequestRepository> {
    pub requests: R,
}

impl<R: ServiceRequestRepository> CreateRequestUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CreateRequestInput,
    ) -> Result<ServiceRequest, FieldopsServiceError> {
        if input.address.trim().is_empty() {
            return Err(FieldopsServiceError::MissingData);
        }
        if !input.estimated_price.is_positive() {
            return Err(FieldopsServiceError::InvalidPrice);
        }
        let now = Utc::now();
        let request = ServiceRequest {
            id: Uuid::now_v7(),
            user_id,
            kind: input.kind,
            address: input.address,
            description: input.description,
            status: RequestStatus::Pending,
            agent_id: None,
            estimated_price: input.estimated_price,
            final_price: None,
            payment_method: None,
            agent_amount: None,
            platform_amount: None,
            created_at: now,
            updated_at: now,
        };
        self.requests.create(&request).await?;
        Ok(request)
    }
}

// ── GetRequest / listings ────────────────────────────────────────────────────

pub struct GetRequestUseCase<R: ServiceRequestRepository, A: AgentRepository> {
    pub requests: R,
    pub agents: A,
}

impl<R: ServiceRequestRepository, A: AgentRepository> GetRequestUseCase<R, A> {
    /// Visible to the requesting customer, the assigned agent, and admins.
    pub async fn execute(
        &self,
        user_id: Uuid,
        is_admin: bool,
        request_id: Uuid,
    ) -> Result<ServiceRequest, FieldopsServiceError> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or(FieldopsServiceError::RequestNotFound)?;
        if is_admin || request.user_id == user_id {
            return Ok(request);
        }
        let agent = self.agents.find_by_user_id(user_id).await?;
        match (agent, request.agent_id) {
            (Some(agent), Some(assigned)) if agent.id == assigned => Ok(request),
            _ => Err(FieldopsServiceError::Forbidden),
        }
    }
}

pub struct ListMyRequestsUseCase<R: ServiceRequestRepository> {
    pub requests: R,
}

impl<R: ServiceRequestRepository> ListMyRequestsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<ServiceRequest>, FieldopsServiceError> {
        self.requests.list_by_user(user_id, page).await
    }
}

pub struct ListRequestsUseCase<R: ServiceRequestRepository> {
    pub requests: R,
}

impl<R: ServiceRequestRepository> ListRequestsUseCase<R> {
    pub async fn execute(
        &self,
        status: Option<RequestStatus>,
        page: PageRequest,
    ) -> Result<Vec<ServiceRequest>, FieldopsServiceError> {
        self.requests.list(status, page).await
    }
}

/// The assigned-work queue for the calling agent.
pub struct ListAssignedRequestsUseCase<R: ServiceRequestRepository, A: AgentRepository> {
    pub requests: R,
    pub agents: A,
}

impl<R: ServiceRequestRepository, A: AgentRepository> ListAssignedRequestsUseCase<R, A> {
    pub async fn execute(
        &self,
        agent_user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<ServiceRequest>, FieldopsServiceError> {
        let agent = self
            .agents
            .find_by_user_id(agent_user_id)
            .await?
            .ok_or(FieldopsServiceError::AgentNotFound)?;
        self.requests.list_by_agent(agent.id, page).await
    }
}

// ── AssignRequest ────────────────────────────────────────────────────────────

pub struct AssignRequestUseCase<R: ServiceRequestRepository, A: AgentRepository> {
    pub requests: R,
    pub agents: A,
}

impl<R: ServiceRequestRepository, A: AgentRepository> AssignRequestUseCase<R, A> {
    pub async fn execute(
        &self,
        request_id: Uuid,
        agent_id: Uuid,
    ) -> Result<(), FieldopsServiceError> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or(FieldopsServiceError::RequestNotFound)?;
        if request.status != RequestStatus::Pending {
            return Err(FieldopsServiceError::InvalidTransition);
        }
        let agent = self
            .agents
            .find_by_id(agent_id)
            .await?
            .ok_or(FieldopsServiceError::AgentNotFound)?;
        if !agent.active {
            return Err(FieldopsServiceError::AgentInactive);
        }
        if !self.requests.assign(request_id, agent_id).await? {
            return Err(FieldopsServiceError::InvalidTransition);
        }
        Ok(())
    }
}

// ── StartRequest ─────────────────────────────────────────────────────────────

pub struct StartRequestUseCase<R: ServiceRequestRepository, A: AgentRepository> {
    pub requests: R,
    pub agents: A,
}

impl<R: ServiceRequestRepository, A: AgentRepository> StartRequestUseCase<R, A> {
    pub async fn execute(
        &self,
        agent_user_id: Uuid,
        request_id: Uuid,
    ) -> Result<(), FieldopsServiceError> {
        let (agent, request) = self
            .load_assigned(agent_user_id, request_id)
            .await?;
        if request.status != RequestStatus::Assigned {
            return Err(FieldopsServiceError::InvalidTransition);
        }
        if !self.requests.start(request_id, agent.id).await? {
            return Err(FieldopsServiceError::InvalidTransition);
        }
        Ok(())
    }

    async fn load_assigned(
        &self,
        agent_user_id: Uuid,
        request_id: Uuid,
    ) -> Result<(Agent, ServiceRequest), FieldopsServiceError> {
        let agent = self
            .agents
            .find_by_user_id(agent_user_id)
            .await?
            .ok_or(FieldopsServiceError::AgentNotFound)?;
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or(FieldopsServiceError::RequestNotFound)?;
        if request.agent_id != Some(agent.id) {
            return Err(FieldopsServiceError::Forbidden);
        }
        Ok((agent, request))
    }
}

// ── CompleteRequest ──────────────────────────────────────────────────────────

pub struct CompleteRequestInput {
    pub final_price: Money,
    pub payment_method: PaymentMethod,
}

#[derive(Debug)]
pub struct CompleteRequestOutput {
    pub final_price: Money,
    pub agent_amount: Money,
    pub platform_amount: Money,
}

/// Completion writes the 85/15 split and the agent's running totals in one
/// repository transaction; partial failure cannot leave the two out of sync.
pub struct CompleteRequestUseCase<R: ServiceRequestRepository, A: AgentRepository> {
    pub requests: R,
    pub agents: A,
}

impl<R: ServiceRequestRepository, A: AgentRepository> CompleteRequestUseCase<R, A> {
    pub async fn execute(
        &self,
        agent_user_id: Uuid,
        request_id: Uuid,
        input: CompleteRequestInput,
    ) -> Result<CompleteRequestOutput, FieldopsServiceError> {
        if !input.final_price.is_positive() {
            return Err(FieldopsServiceError::InvalidPrice);
        }
        let agent = self
            .agents
            .find_by_user_id(agent_user_id)
            .await?
            .ok_or(FieldopsServiceError::AgentNotFound)?;
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or(FieldopsServiceError::RequestNotFound)?;
        if request.agent_id != Some(agent.id) {
            return Err(FieldopsServiceError::Forbidden);
        }
        if request.status != RequestStatus::InProgress {
            return Err(FieldopsServiceError::InvalidTransition);
        }

        let split = EarningsSplit::of(input.final_price);
        if !self
            .requests
            .complete(
                request_id,
                agent.id,
                input.final_price,
                input.payment_method,
                split,
            )
            .await?
        {
            // Completed or moved concurrently; never double-counted.
            return Err(FieldopsServiceError::InvalidTransition);
        }
        Ok(CompleteRequestOutput {
            final_price: input.final_price,
            agent_amount: split.agent,
            platform_amount: split.platform,
        })
    }
}

// ── CancelRequest / RejectRequest ────────────────────────────────────────────

pub struct CancelRequestUseCase<R: ServiceRequestRepository> {
    pub requests: R,
}

impl<R: ServiceRequestRepository> CancelRequestUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<(), FieldopsServiceError> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or(FieldopsServiceError::RequestNotFound)?;
        if request.user_id != user_id {
            return Err(FieldopsServiceError::Forbidden);
        }
        if request.status != RequestStatus::Pending {
            return Err(FieldopsServiceError::InvalidTransition);
        }
        if !self.requests.cancel(request_id).await? {
            return Err(FieldopsServiceError::InvalidTransition);
        }
        Ok(())
    }
}

pub struct RejectRequestUseCase<R: ServiceRequestRepository> {
    pub requests: R,
}

impl<R: ServiceRequestRepository> RejectRequestUseCase<R> {
    pub async fn execute(&self, request_id: Uuid) -> Result<(), FieldopsServiceError> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or(FieldopsServiceError::RequestNotFound)?;
        if request.status != RequestStatus::Pending {
            return Err(FieldopsServiceError::InvalidTransition);
        }
        if !self.requests.reject(request_id).await? {
            return Err(FieldopsServiceError::InvalidTransition);
        }
        Ok(())
    }
}
