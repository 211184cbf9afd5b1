//! The single role-authorization check consulted by every privileged handler.
//!
//! The gateway-injected `x-frostline-user-role` header is the sole source of
//! truth for access decisions. Handlers never compare role numbers inline;
//! they call [`require_role`] (or [`require_admin`]) and map the error to
//! their service's `Forbidden` variant.

use frostline_domain::user::UserRole;

use crate::identity::IdentityHeaders;

/// Returned when the caller's role is unknown or below the requirement.
#[derive(Debug, thiserror::Error)]
#[error("requires at least {required:?} role")]
pub struct InsufficientRole {
    pub required: UserRole,
}

/// Deny unless the identity carries `required` or a higher role.
///
/// Unknown role values (anything outside the `UserRole` wire range) are
/// always denied.
pub fn require_role(identity: &IdentityHeaders, required: UserRole) -> Result<(), InsufficientRole> {
    match UserRole::from_u8(identity.user_role) {
        Some(role) if role >= required => Ok(()),
        _ => Err(InsufficientRole { required }),
    }
}

/// Shorthand for [`require_role`] with [`UserRole::Admin`].
pub fn require_admin(identity: &IdentityHeaders) -> Result<(), InsufficientRole> {
    require_role(identity, UserRole::Admin)
}
