use chrono::Utc;
use uuid::Uuid;

use frostline_domain::pagination::PageRequest;

use crate::domain::repository::AgentApplicationRepository;
use crate::domain::types::{Agent, AgentApplication, ApplicationStatus, ServiceKind};
use crate::error::FieldopsServiceError;

// ── Apply ────────────────────────────────────────────────────────────────────

pub struct ApplyInput {
    pub name: String,
    pub phone: String,
    pub service_kinds: Vec<ServiceKind>,
    pub latitude: f64,
    pub longitude: f64,
}

pub struct ApplyUseCase<R: AgentApplicationRepository> {
    pub repo: R,
}

impl<R: AgentApplicationRepository> ApplyUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: ApplyInput,
    ) -> Result<AgentApplication, FieldopsServiceError> {
        if input.name.trim().is_empty() || input.phone.trim().is_empty() {
            return Err(FieldopsServiceError::MissingData);
        }
        if input.service_kinds.is_empty() {
            return Err(FieldopsServiceError::InvalidKind);
        }
        if !(-90.0..=90.0).contains(&input.latitude)
            || !(-180.0..=180.0).contains(&input.longitude)
        {
            return Err(FieldopsServiceError::InvalidCoordinates);
        }
        if self.repo.has_pending(user_id).await? {
            return Err(FieldopsServiceError::ApplicationPendingExists);
        }
        let application = AgentApplication {
            id: Uuid::now_v7(),
            user_id,
            name: input.name,
            phone: input.phone,
            service_kinds: input.service_kinds,
            latitude: input.latitude,
            longitude: input.longitude,
            status: ApplicationStatus::Pending,
            decided_at: None,
            created_at: Utc::now(),
        };
        self.repo.create(&application).await?;
        Ok(application)
    }
}

// ── ListApplications ─────────────────────────────────────────────────────────

pub struct ListApplicationsUseCase<R: AgentApplicationRepository> {
    pub repo: R,
}

impl<R: AgentApplicationRepository> ListApplicationsUseCase<R> {
    pub async fn execute(
        &self,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Vec<AgentApplication>, FieldopsServiceError> {
        self.repo.list(status, page).await
    }
}

// ── ApproveApplication ───────────────────────────────────────────────────────

/// Approval provisions the agent record, marks the application approved, and
/// promotes the user's role read model in one repository transaction.
pub struct ApproveApplicationUseCase<R: AgentApplicationRepository> {
    pub repo: R,
}

impl<R: AgentApplicationRepository> ApproveApplicationUseCase<R> {
    pub async fn execute(&self, application_id: Uuid) -> Result<Agent, FieldopsServiceError> {
        let application = self
            .repo
            .find_by_id(application_id)
            .await?
            .ok_or(FieldopsServiceError::ApplicationNotFound)?;
        if application.status != ApplicationStatus::Pending {
            return Err(FieldopsServiceError::ApplicationAlreadyDecided);
        }
        let agent = application.provision_agent();
        if !self.repo.approve(application_id, &agent).await? {
            // Decided concurrently between the read and the guard.
            return Err(FieldopsServiceError::ApplicationAlreadyDecided);
        }
        Ok(agent)
    }
}

// ── RejectApplication ────────────────────────────────────────────────────────

pub struct RejectApplicationUseCase<R: AgentApplicationRepository> {
    pub repo: R,
}

impl<R: AgentApplicationRepository> RejectApplicationUseCase<R> {
    pub async fn execute(&self, application_id: Uuid) -> Result<(), FieldopsServiceError> {
        if self.repo.find_by_id(application_id).await?.is_none() {
            return Err(FieldopsServiceError::ApplicationNotFound);
        }
        if !self.repo.reject(application_id).await? {
            return Err(FieldopsServiceError::ApplicationAlreadyDecided);
        }
        Ok(())
    }
}
