use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use frostline_auth_types::identity::IdentityHeaders;
use frostline_auth_types::policy::require_admin;
use frostline_domain::user::UserRole;

use crate::domain::types::User;
use crate::error::FieldopsServiceError;
use crate::state::AppState;
use crate::usecase::role::{GrantRoleUseCase, RevokeAdminUseCase};
use crate::usecase::user::{
    GetUserUseCase, ListUsersUseCase, RegisterUserInput, RegisterUserUseCase, UpdateUserInput,
    UpdateUserUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: u8,
    #[serde(serialize_with = "frostline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "frostline_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role.as_u8(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

pub async fn register_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), FieldopsServiceError> {
    let usecase = RegisterUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            identity.user_id,
            RegisterUserInput {
                name: body.name,
                email: body.email,
                phone: body.phone,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, FieldopsServiceError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/@me ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

pub async fn update_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<StatusCode, FieldopsServiceError> {
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            UpdateUserInput {
                name: body.name,
                phone: body.phone,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users ───────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct UserListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_users(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<UserResponse>>, FieldopsServiceError> {
    require_admin(&identity).map_err(|_| FieldopsServiceError::Forbidden)?;
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let page = frostline_domain::pagination::PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let users = usecase.execute(page).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── PUT /users/{id}/role ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GrantRoleRequest {
    pub role: u8,
}

pub async fn grant_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<GrantRoleRequest>,
) -> Result<StatusCode, FieldopsServiceError> {
    require_admin(&identity).map_err(|_| FieldopsServiceError::Forbidden)?;
    let role = UserRole::from_u8(body.role).ok_or(FieldopsServiceError::InvalidRole)?;
    let usecase = GrantRoleUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(identity.user_id, id, role).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /users/{id}/role ──────────────────────────────────────────────────

pub async fn revoke_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, FieldopsServiceError> {
    require_admin(&identity).map_err(|_| FieldopsServiceError::Forbidden)?;
    let usecase = RevokeAdminUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
