use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use frostline_auth_types::identity::IdentityHeaders;
use frostline_auth_types::policy::require_admin;

use crate::domain::types::{AgentApplication, ApplicationStatus, ServiceKind};
use crate::error::FieldopsServiceError;
use crate::handlers::agent::AgentResponse;
use crate::state::AppState;
use crate::usecase::application::{
    ApplyInput, ApplyUseCase, ApproveApplicationUseCase, ListApplicationsUseCase,
    RejectApplicationUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ApplicationResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub service_kinds: Vec<&'static str>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: &'static str,
    #[serde(serialize_with = "frostline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AgentApplication> for ApplicationResponse {
    fn from(application: AgentApplication) -> Self {
        Self {
            id: application.id.to_string(),
            user_id: application.user_id.to_string(),
            name: application.name,
            phone: application.phone,
            service_kinds: application
                .service_kinds
                .iter()
                .map(|k| k.as_str())
                .collect(),
            latitude: application.latitude,
            longitude: application.longitude,
            status: application.status.as_str(),
            created_at: application.created_at,
        }
    }
}

// ── POST /agents/applications ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ApplyRequest {
    pub name: String,
    pub phone: String,
    pub service_kinds: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
}

pub async fn apply(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplicationResponse>), FieldopsServiceError> {
    let service_kinds = body
        .service_kinds
        .iter()
        .map(|s| ServiceKind::parse(s).ok_or(FieldopsServiceError::InvalidKind))
        .collect::<Result<Vec<_>, _>>()?;
    let usecase = ApplyUseCase {
        repo: state.application_repo(),
    };
    let application = usecase
        .execute(
            identity.user_id,
            ApplyInput {
                name: body.name,
                phone: body.phone,
                service_kinds,
                latitude: body.latitude,
                longitude: body.longitude,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(application.into())))
}

// ── GET /agents/applications ─────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ApplicationListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub status: Option<String>,
}

pub async fn list_applications(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<Json<Vec<ApplicationResponse>>, FieldopsServiceError> {
    require_admin(&identity).map_err(|_| FieldopsServiceError::Forbidden)?;
    let status = match query.status.as_deref() {
        Some(s) => Some(ApplicationStatus::parse(s).ok_or(FieldopsServiceError::InvalidStatus)?),
        None => None,
    };
    let usecase = ListApplicationsUseCase {
        repo: state.application_repo(),
    };
    let page = frostline_domain::pagination::PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let applications = usecase.execute(status, page).await?;
    Ok(Json(
        applications
            .into_iter()
            .map(ApplicationResponse::from)
            .collect(),
    ))
}

// ── POST /agents/applications/{id}/approve ───────────────────────────────────

pub async fn approve_application(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AgentResponse>, FieldopsServiceError> {
    require_admin(&identity).map_err(|_| FieldopsServiceError::Forbidden)?;
    let usecase = ApproveApplicationUseCase {
        repo: state.application_repo(),
    };
    let agent = usecase.execute(id).await?;
    Ok(Json(agent.into()))
}

// ── POST /agents/applications/{id}/reject ────────────────────────────────────

pub async fn reject_application(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, FieldopsServiceError> {
    require_admin(&identity).map_err(|_| FieldopsServiceError::Forbidden)?;
    let usecase = RejectApplicationUseCase {
        repo: state.application_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
