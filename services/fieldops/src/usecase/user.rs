use chrono::Utc;
use uuid::Uuid;

use frostline_domain::pagination::PageRequest;
use frostline_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::FieldopsServiceError;

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Provision the profile for a gateway-authenticated identity. The id is the
/// identity provider's subject, so a second registration is a conflict.
pub struct RegisterUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RegisterUserUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: RegisterUserInput,
    ) -> Result<User, FieldopsServiceError> {
        if input.name.trim().is_empty() || input.email.trim().is_empty() {
            return Err(FieldopsServiceError::MissingData);
        }
        if self.repo.find_by_id(user_id).await?.is_some() {
            return Err(FieldopsServiceError::UserAlreadyExists);
        }
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(FieldopsServiceError::UserAlreadyExists);
        }
        let now = Utc::now();
        let user = User {
            id: user_id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            role: UserRole::Customer,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, FieldopsServiceError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(FieldopsServiceError::UserNotFound)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

pub struct UpdateUserInput {
    pub name: Option<String>,
    pub phone: Option<String>,
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateUserInput,
    ) -> Result<(), FieldopsServiceError> {
        if input.name.is_none() && input.phone.is_none() {
            return Err(FieldopsServiceError::MissingData);
        }
        if let Some(ref name) = input.name {
            if name.trim().is_empty() {
                return Err(FieldopsServiceError::MissingData);
            }
        }
        if self.repo.find_by_id(user_id).await?.is_none() {
            return Err(FieldopsServiceError::UserNotFound);
        }
        self.repo
            .update_profile(user_id, input.name.as_deref(), input.phone.as_deref())
            .await
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<User>, FieldopsServiceError> {
        self.repo.list(page).await
    }
}
