use uuid::Uuid;

use frostline_domain::pagination::PageRequest;

use crate::domain::repository::AgentRepository;
use crate::domain::types::Agent;
use crate::error::FieldopsServiceError;

// ── GetMyAgent ───────────────────────────────────────────────────────────────

pub struct GetMyAgentUseCase<R: AgentRepository> {
    pub repo: R,
}

impl<R: AgentRepository> GetMyAgentUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Agent, FieldopsServiceError> {
        self.repo
            .find_by_user_id(user_id)
            .await?
            .ok_or(FieldopsServiceError::AgentNotFound)
    }
}

// ── ListAgents ───────────────────────────────────────────────────────────────

pub struct ListAgentsUseCase<R: AgentRepository> {
    pub repo: R,
}

impl<R: AgentRepository> ListAgentsUseCase<R> {
    pub async fn execute(
        &self,
        active_only: bool,
        page: PageRequest,
    ) -> Result<Vec<Agent>, FieldopsServiceError> {
        self.repo.list(active_only, page).await
    }
}

// ── SetAgentActive ───────────────────────────────────────────────────────────

pub struct SetAgentActiveUseCase<R: AgentRepository> {
    pub repo: R,
}

impl<R: AgentRepository> SetAgentActiveUseCase<R> {
    pub async fn execute(&self, agent_id: Uuid, active: bool) -> Result<(), FieldopsServiceError> {
        if !self.repo.set_active(agent_id, active).await? {
            return Err(FieldopsServiceError::AgentNotFound);
        }
        Ok(())
    }
}
