use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use frostline_domain::money::{EarningsSplit, Money};
use frostline_domain::pagination::PageRequest;
use frostline_domain::user::UserRole;
use frostline_fieldops::domain::repository::{
    AgentApplicationRepository, AgentRepository, ServiceRequestRepository, UserRepository,
};
use frostline_fieldops::domain::types::{
    Agent, AgentApplication, ApplicationStatus, PaymentMethod, RequestStatus, ServiceKind,
    ServiceRequest, User,
};
use frostline_fieldops::error::FieldopsServiceError;

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn with(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn role_of(&self, id: Uuid) -> Option<UserRole> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.role)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, FieldopsServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, FieldopsServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), FieldopsServiceError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<(), FieldopsServiceError> {
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            if let Some(name) = name {
                user.name = name.to_owned();
            }
            if let Some(phone) = phone {
                user.phone = Some(phone.to_owned());
            }
        }
        Ok(())
    }

    async fn list(&self, _page: PageRequest) -> Result<Vec<User>, FieldopsServiceError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<bool, FieldopsServiceError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.role = role;
        Ok(true)
    }
}

// ── MockAgentRepo ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockAgentRepo {
    pub agents: Arc<Mutex<Vec<Agent>>>,
}

impl MockAgentRepo {
    pub fn with(agents: Vec<Agent>) -> Self {
        Self {
            agents: Arc::new(Mutex::new(agents)),
        }
    }
}

impl AgentRepository for MockAgentRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, FieldopsServiceError> {
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Agent>, FieldopsServiceError> {
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.user_id == user_id)
            .cloned())
    }

    async fn list(
        &self,
        active_only: bool,
        _page: PageRequest,
    ) -> Result<Vec<Agent>, FieldopsServiceError> {
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .filter(|a| !active_only || a.active)
            .cloned()
            .collect())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<bool, FieldopsServiceError> {
        let mut agents = self.agents.lock().unwrap();
        let Some(agent) = agents.iter_mut().find(|a| a.id == id) else {
            return Ok(false);
        };
        agent.active = active;
        Ok(true)
    }
}

// ── MockApplicationRepo ──────────────────────────────────────────────────────

/// Shares the agent and user stores so `approve` models the production
/// transaction: decide the application, insert the agent, promote the role.
#[derive(Clone, Default)]
pub struct MockApplicationRepo {
    pub applications: Arc<Mutex<Vec<AgentApplication>>>,
    pub agents: Arc<Mutex<Vec<Agent>>>,
    pub users: Arc<Mutex<Vec<User>>>,
}

impl AgentApplicationRepository for MockApplicationRepo {
    async fn create(&self, application: &AgentApplication) -> Result<(), FieldopsServiceError> {
        self.applications.lock().unwrap().push(application.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<AgentApplication>, FieldopsServiceError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn list(
        &self,
        status: Option<ApplicationStatus>,
        _page: PageRequest,
    ) -> Result<Vec<AgentApplication>, FieldopsServiceError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| status.is_none_or(|s| a.status == s))
            .cloned()
            .collect())
    }

    async fn has_pending(&self, user_id: Uuid) -> Result<bool, FieldopsServiceError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.user_id == user_id && a.status == ApplicationStatus::Pending))
    }

    async fn approve(&self, id: Uuid, agent: &Agent) -> Result<bool, FieldopsServiceError> {
        let mut applications = self.applications.lock().unwrap();
        let Some(application) = applications
            .iter_mut()
            .find(|a| a.id == id && a.status == ApplicationStatus::Pending)
        else {
            return Ok(false);
        };
        application.status = ApplicationStatus::Approved;
        application.decided_at = Some(Utc::now());
        drop(applications);

        self.agents.lock().unwrap().push(agent.clone());
        if let Some(user) = self
            .users
            .lock()
            .unwrap()
            .iter_mut()
            .find(|u| u.id == agent.user_id)
        {
            user.role = UserRole::Agent;
        }
        Ok(true)
    }

    async fn reject(&self, id: Uuid) -> Result<bool, FieldopsServiceError> {
        let mut applications = self.applications.lock().unwrap();
        let Some(application) = applications
            .iter_mut()
            .find(|a| a.id == id && a.status == ApplicationStatus::Pending)
        else {
            return Ok(false);
        };
        application.status = ApplicationStatus::Rejected;
        application.decided_at = Some(Utc::now());
        Ok(true)
    }
}

// ── MockRequestRepo ──────────────────────────────────────────────────────────

/// Shares the agent store so `complete` models the production transaction:
/// the request update and the totals increments happen together.
#[derive(Clone, Default)]
pub struct MockRequestRepo {
    pub requests: Arc<Mutex<Vec<ServiceRequest>>>,
    pub agents: Arc<Mutex<Vec<Agent>>>,
}

impl MockRequestRepo {
    pub fn status_of(&self, id: Uuid) -> Option<RequestStatus> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status)
    }
}

impl ServiceRequestRepository for MockRequestRepo {
    async fn create(&self, request: &ServiceRequest) -> Result<(), FieldopsServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<ServiceRequest>, FieldopsServiceError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list(
        &self,
        status: Option<RequestStatus>,
        _page: PageRequest,
    ) -> Result<Vec<ServiceRequest>, FieldopsServiceError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<ServiceRequest>, FieldopsServiceError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_agent(
        &self,
        agent_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<ServiceRequest>, FieldopsServiceError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.agent_id == Some(agent_id))
            .cloned()
            .collect())
    }

    async fn assign(&self, id: Uuid, agent_id: Uuid) -> Result<bool, FieldopsServiceError> {
        let mut requests = self.requests.lock().unwrap();
        let Some(request) = requests
            .iter_mut()
            .find(|r| r.id == id && r.status == RequestStatus::Pending)
        else {
            return Ok(false);
        };
        request.status = RequestStatus::Assigned;
        request.agent_id = Some(agent_id);
        Ok(true)
    }

    async fn start(&self, id: Uuid, agent_id: Uuid) -> Result<bool, FieldopsServiceError> {
        let mut requests = self.requests.lock().unwrap();
        let Some(request) = requests.iter_mut().find(|r| {
            r.id == id && r.agent_id == Some(agent_id) && r.status == RequestStatus::Assigned
        }) else {
            return Ok(false);
        };
        request.status = RequestStatus::InProgress;
        Ok(true)
    }

    async fn complete(
        &self,
        id: Uuid,
        agent_id: Uuid,
        final_price: Money,
        method: PaymentMethod,
        split: EarningsSplit,
    ) -> Result<bool, FieldopsServiceError> {
        let mut requests = self.requests.lock().unwrap();
        let Some(request) = requests.iter_mut().find(|r| {
            r.id == id && r.agent_id == Some(agent_id) && r.status == RequestStatus::InProgress
        }) else {
            return Ok(false);
        };
        request.status = RequestStatus::Completed;
        request.final_price = Some(final_price);
        request.payment_method = Some(method);
        request.agent_amount = Some(split.agent);
        request.platform_amount = Some(split.platform);
        drop(requests);

        if let Some(agent) = self
            .agents
            .lock()
            .unwrap()
            .iter_mut()
            .find(|a| a.id == agent_id)
        {
            agent.total_services += 1;
            agent.total_earnings = Money::from_cents(
                agent.total_earnings.cents() + split.agent.cents(),
            );
        }
        Ok(true)
    }

    async fn cancel(&self, id: Uuid) -> Result<bool, FieldopsServiceError> {
        let mut requests = self.requests.lock().unwrap();
        let Some(request) = requests
            .iter_mut()
            .find(|r| r.id == id && r.status == RequestStatus::Pending)
        else {
            return Ok(false);
        };
        request.status = RequestStatus::Cancelled;
        Ok(true)
    }

    async fn reject(&self, id: Uuid) -> Result<bool, FieldopsServiceError> {
        let mut requests = self.requests.lock().unwrap();
        let Some(request) = requests
            .iter_mut()
            .find(|r| r.id == id && r.status == RequestStatus::Pending)
        else {
            return Ok(false);
        };
        request.status = RequestStatus::Rejected;
        Ok(true)
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_user(role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        name: "Asha".to_owned(),
        email: format!("{}@example.com", Uuid::new_v4()),
        phone: Some("+91-9000000000".to_owned()),
        role,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_agent(user_id: Uuid) -> Agent {
    let now = Utc::now();
    Agent {
        id: Uuid::now_v7(),
        user_id,
        name: "Ravi".to_owned(),
        phone: "+91-9000000001".to_owned(),
        service_kinds: vec![ServiceKind::Installation, ServiceKind::Repair],
        latitude: 12.97,
        longitude: 77.59,
        active: true,
        total_services: 0,
        total_earnings: Money::ZERO,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_application(user_id: Uuid) -> AgentApplication {
    AgentApplication {
        id: Uuid::now_v7(),
        user_id,
        name: "Ravi".to_owned(),
        phone: "+91-9000000001".to_owned(),
        service_kinds: vec![ServiceKind::Installation],
        latitude: 12.97,
        longitude: 77.59,
        status: ApplicationStatus::Pending,
        decided_at: None,
        created_at: Utc::now(),
    }
}

pub fn test_request(
    user_id: Uuid,
    status: RequestStatus,
    agent_id: Option<Uuid>,
) -> ServiceRequest {
    let now = Utc::now();
    ServiceRequest {
        id: Uuid::now_v7(),
        user_id,
        kind: ServiceKind::Repair,
        address: "12 Lakeview Road".to_owned(),
        description: Some("unit not cooling".to_owned()),
        status,
        agent_id,
        estimated_price: Money::from_major(800),
        final_price: None,
        payment_method: None,
        agent_amount: None,
        platform_amount: None,
        created_at: now,
        updated_at: now,
    }
}
