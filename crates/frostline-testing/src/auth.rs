//! Mock gateway identity for integration tests.
//!
//! Services behind the gateway receive `x-frostline-user-id` +
//! `x-frostline-user-role` headers injected by the gateway. In tests,
//! `MockAuth` produces these headers directly so no real gateway is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use frostline_domain::user::UserRole;
use uuid::Uuid;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub user_role: u8,
}

impl MockAuth {
    pub fn new(user_id: Uuid, user_role: u8) -> Self {
        Self { user_id, user_role }
    }

    pub fn customer(user_id: Uuid) -> Self {
        Self::new(user_id, UserRole::Customer.as_u8())
    }

    pub fn agent(user_id: Uuid) -> Self {
        Self::new(user_id, UserRole::Agent.as_u8())
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self::new(user_id, UserRole::Admin.as_u8())
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("x-frostline-user-id"),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static("x-frostline-user-role"),
            HeaderValue::from_str(&self.user_role.to_string()).unwrap(),
        );
        map
    }

    /// The identity as the extractor would produce it.
    pub fn identity(&self) -> frostline_auth_types::identity::IdentityHeaders {
        frostline_auth_types::identity::IdentityHeaders {
            user_id: self.user_id,
            user_role: self.user_role,
        }
    }
}
