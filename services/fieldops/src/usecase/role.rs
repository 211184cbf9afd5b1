use uuid::Uuid;

use frostline_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::error::FieldopsServiceError;

// ── GrantRole ────────────────────────────────────────────────────────────────

/// Admin role management. Updates the role read model; the identity provider
/// mirror is synced out-of-band. An admin cannot change their own role, so a
/// sole admin can never lock the platform out.
pub struct GrantRoleUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GrantRoleUseCase<R> {
    pub async fn execute(
        &self,
        acting_admin: Uuid,
        target: Uuid,
        role: UserRole,
    ) -> Result<(), FieldopsServiceError> {
        if acting_admin == target {
            return Err(FieldopsServiceError::CannotChangeOwnRole);
        }
        if !self.repo.set_role(target, role).await? {
            return Err(FieldopsServiceError::UserNotFound);
        }
        Ok(())
    }
}

// ── RevokeAdmin ──────────────────────────────────────────────────────────────

pub struct RevokeAdminUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RevokeAdminUseCase<R> {
    pub async fn execute(
        &self,
        acting_admin: Uuid,
        target: Uuid,
    ) -> Result<(), FieldopsServiceError> {
        if acting_admin == target {
            return Err(FieldopsServiceError::CannotChangeOwnRole);
        }
        if !self.repo.set_role(target, UserRole::Customer).await? {
            return Err(FieldopsServiceError::UserNotFound);
        }
        Ok(())
    }
}
