use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use frostline_auth_types::identity::IdentityHeaders;
use frostline_auth_types::policy::require_admin;

use crate::domain::types::Agent;
use crate::error::FieldopsServiceError;
use crate::state::AppState;
use crate::usecase::agent::{GetMyAgentUseCase, ListAgentsUseCase, SetAgentActiveUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AgentResponse {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub service_kinds: Vec<&'static str>,
    pub latitude: f64,
    pub longitude: f64,
    pub active: bool,
    pub total_services: i64,
    pub total_earnings_cents: i64,
}

impl From<Agent> for AgentResponse {
    fn from(agent: Agent) -> Self {
        Self {
            id: agent.id.to_string(),
            name: agent.name,
            phone: agent.phone,
            service_kinds: agent.service_kinds.iter().map(|k| k.as_str()).collect(),
            latitude: agent.latitude,
            longitude: agent.longitude,
            active: agent.active,
            total_services: agent.total_services,
            total_earnings_cents: agent.total_earnings.cents(),
        }
    }
}

// ── GET /agents ──────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct AgentListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    #[serde(default)]
    pub active_only: bool,
}

pub async fn list_agents(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<AgentListQuery>,
) -> Result<Json<Vec<AgentResponse>>, FieldopsServiceError> {
    require_admin(&identity).map_err(|_| FieldopsServiceError::Forbidden)?;
    let usecase = ListAgentsUseCase {
        repo: state.agent_repo(),
    };
    let page = frostline_domain::pagination::PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let agents = usecase.execute(query.active_only, page).await?;
    Ok(Json(agents.into_iter().map(AgentResponse::from).collect()))
}

// ── GET /agents/@me ──────────────────────────────────────────────────────────

pub async fn get_my_agent(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<AgentResponse>, FieldopsServiceError> {
    let usecase = GetMyAgentUseCase {
        repo: state.agent_repo(),
    };
    let agent = usecase.execute(identity.user_id).await?;
    Ok(Json(agent.into()))
}

// ── PATCH /agents/{id}/active ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

pub async fn set_agent_active(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetActiveRequest>,
) -> Result<StatusCode, FieldopsServiceError> {
    require_admin(&identity).map_err(|_| FieldopsServiceError::Forbidden)?;
    let usecase = SetAgentActiveUseCase {
        repo: state.agent_repo(),
    };
    usecase.execute(id, body.active).await?;
    Ok(StatusCode::NO_CONTENT)
}
