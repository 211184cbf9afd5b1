use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use frostline_auth_types::identity::IdentityHeaders;
use frostline_auth_types::policy::require_admin;
use frostline_domain::money::Money;

use crate::domain::types::{PaymentMethod, RequestStatus, ServiceKind, ServiceRequest};
use crate::error::FieldopsServiceError;
use crate::state::AppState;
use crate::usecase::request::{
    AssignRequestUseCase, CancelRequestUseCase, CompleteRequestInput, CompleteRequestUseCase,
    CreateRequestInput, CreateRequestUseCase, GetRequestUseCase, ListAssignedRequestsUseCase,
    ListMyRequestsUseCase, ListRequestsUseCase, RejectRequestUseCase, StartRequestUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RequestResponse {
    pub id: String,
    pub user_id: String,
    pub kind: &'static str,
    pub address: String,
    pub description: Option<String>,
    pub status: &'static str,
    pub agent_id: Option<String>,
    pub estimated_price_cents: i64,
    pub final_price_cents: Option<i64>,
    pub payment_method: Option<&'static str>,
    pub agent_amount_cents: Option<i64>,
    pub platform_amount_cents: Option<i64>,
    #[serde(serialize_with = "frostline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "frostline_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ServiceRequest> for RequestResponse {
    fn from(request: ServiceRequest) -> Self {
        Self {
            id: request.id.to_string(),
            user_id: request.user_id.to_string(),
            kind: request.kind.as_str(),
            address: request.address,
            description: request.description,
            status: request.status.as_str(),
            agent_id: request.agent_id.map(|id| id.to_string()),
            estimated_price_cents: request.estimated_price.cents(),
            final_price_cents: request.final_price.map(Money::cents),
            payment_method: request.payment_method.map(PaymentMethod::as_str),
            agent_amount_cents: request.agent_amount.map(Money::cents),
            platform_amount_cents: request.platform_amount.map(Money::cents),
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RequestListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub status: Option<String>,
}

fn page_from(query: &RequestListQuery) -> frostline_domain::pagination::PageRequest {
    frostline_domain::pagination::PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    }
}

// ── POST /service-requests ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateRequestRequest {
    pub kind: String,
    pub address: String,
    pub description: Option<String>,
    pub estimated_price_cents: i64,
}

pub async fn create_request(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateRequestRequest>,
) -> Result<(StatusCode, Json<RequestResponse>), FieldopsServiceError> {
    let kind = ServiceKind::parse(&body.kind).ok_or(FieldopsServiceError::InvalidKind)?;
    let usecase = CreateRequestUseCase {
        requests: state.request_repo(),
    };
    let request = usecase
        .execute(
            identity.user_id,
            CreateRequestInput {
                kind,
                address: body.address,
                description: body.description,
                estimated_price: Money::from_cents(body.estimated_price_cents),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(request.into())))
}

// ── GET /service-requests/@me ────────────────────────────────────────────────

pub async fn list_my_requests(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<Vec<RequestResponse>>, FieldopsServiceError> {
    let usecase = ListMyRequestsUseCase {
        requests: state.request_repo(),
    };
    let requests = usecase.execute(identity.user_id, page_from(&query)).await?;
    Ok(Json(requests.into_iter().map(RequestResponse::from).collect()))
}

// ── GET /service-requests ────────────────────────────────────────────────────

pub async fn list_requests(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<Vec<RequestResponse>>, FieldopsServiceError> {
    require_admin(&identity).map_err(|_| FieldopsServiceError::Forbidden)?;
    let status = match query.status.as_deref() {
        Some(s) => Some(RequestStatus::parse(s).ok_or(FieldopsServiceError::InvalidStatus)?),
        None => None,
    };
    let usecase = ListRequestsUseCase {
        requests: state.request_repo(),
    };
    let requests = usecase.execute(status, page_from(&query)).await?;
    Ok(Json(requests.into_iter().map(RequestResponse::from).collect()))
}

// ── GET /service-requests/assigned ───────────────────────────────────────────

pub async fn list_assigned_requests(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<Vec<RequestResponse>>, FieldopsServiceError> {
    let usecase = ListAssignedRequestsUseCase {
        requests: state.request_repo(),
        agents: state.agent_repo(),
    };
    let requests = usecase.execute(identity.user_id, page_from(&query)).await?;
    Ok(Json(requests.into_iter().map(RequestResponse::from).collect()))
}

// ── GET /service-requests/{id} ───────────────────────────────────────────────

pub async fn get_request(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RequestResponse>, FieldopsServiceError> {
    let usecase = GetRequestUseCase {
        requests: state.request_repo(),
        agents: state.agent_repo(),
    };
    let is_admin = require_admin(&identity).is_ok();
    let request = usecase.execute(identity.user_id, is_admin, id).await?;
    Ok(Json(request.into()))
}

// ── POST /service-requests/{id}/assign ───────────────────────────────────────

#[derive(Deserialize)]
pub struct AssignRequestRequest {
    pub agent_id: Uuid,
}

pub async fn assign_request(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AssignRequestRequest>,
) -> Result<StatusCode, FieldopsServiceError> {
    require_admin(&identity).map_err(|_| FieldopsServiceError::Forbidden)?;
    let usecase = AssignRequestUseCase {
        requests: state.request_repo(),
        agents: state.agent_repo(),
    };
    usecase.execute(id, body.agent_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /service-requests/{id}/start ────────────────────────────────────────

pub async fn start_request(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, FieldopsServiceError> {
    let usecase = StartRequestUseCase {
        requests: state.request_repo(),
        agents: state.agent_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /service-requests/{id}/complete ─────────────────────────────────────

#[derive(Deserialize)]
pub struct CompleteRequestRequest {
    pub final_price_cents: i64,
    pub payment_method: String,
}

#[derive(Serialize)]
pub struct CompleteRequestResponse {
    pub final_price_cents: i64,
    pub agent_amount_cents: i64,
    pub platform_amount_cents: i64,
}

pub async fn complete_request(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CompleteRequestRequest>,
) -> Result<Json<CompleteRequestResponse>, FieldopsServiceError> {
    let payment_method =
        PaymentMethod::parse(&body.payment_method).ok_or(FieldopsServiceError::MissingData)?;
    let usecase = CompleteRequestUseCase {
        requests: state.request_repo(),
        agents: state.agent_repo(),
    };
    let output = usecase
        .execute(
            identity.user_id,
            id,
            CompleteRequestInput {
                final_price: Money::from_cents(body.final_price_cents),
                payment_method,
            },
        )
        .await?;
    Ok(Json(CompleteRequestResponse {
        final_price_cents: output.final_price.cents(),
        agent_amount_cents: output.agent_amount.cents(),
        platform_amount_cents: output.platform_amount.cents(),
    }))
}

// ── POST /service-requests/{id}/cancel ───────────────────────────────────────

pub async fn cancel_request(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, FieldopsServiceError> {
    let usecase = CancelRequestUseCase {
        requests: state.request_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /service-requests/{id}/reject ───────────────────────────────────────

pub async fn reject_request(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, FieldopsServiceError> {
    require_admin(&identity).map_err(|_| FieldopsServiceError::Forbidden)?;
    let usecase = RejectRequestUseCase {
        requests: state.request_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
