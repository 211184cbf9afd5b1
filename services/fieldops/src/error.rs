use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Fieldops service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum FieldopsServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("agent not found")]
    AgentNotFound,
    #[error("agent is not active")]
    AgentInactive,
    #[error("application not found")]
    ApplicationNotFound,
    #[error("a pending application already exists")]
    ApplicationPendingExists,
    #[error("application already decided")]
    ApplicationAlreadyDecided,
    #[error("service request not found")]
    RequestNotFound,
    #[error("invalid service kind")]
    InvalidKind,
    #[error("invalid price")]
    InvalidPrice,
    #[error("invalid status")]
    InvalidStatus,
    #[error("invalid role")]
    InvalidRole,
    #[error("invalid status transition")]
    InvalidTransition,
    #[error("invalid coordinates")]
    InvalidCoordinates,
    #[error("cannot change own role")]
    CannotChangeOwnRole,
    #[error("missing data")]
    MissingData,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl FieldopsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::AgentNotFound => "AGENT_NOT_FOUND",
            Self::AgentInactive => "AGENT_INACTIVE",
            Self::ApplicationNotFound => "APPLICATION_NOT_FOUND",
            Self::ApplicationPendingExists => "APPLICATION_PENDING_EXISTS",
            Self::ApplicationAlreadyDecided => "APPLICATION_ALREADY_DECIDED",
            Self::RequestNotFound => "REQUEST_NOT_FOUND",
            Self::InvalidKind => "INVALID_KIND",
            Self::InvalidPrice => "INVALID_PRICE",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidRole => "INVALID_ROLE",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::InvalidCoordinates => "INVALID_COORDINATES",
            Self::CannotChangeOwnRole => "CANNOT_CHANGE_OWN_ROLE",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for FieldopsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound
            | Self::AgentNotFound
            | Self::ApplicationNotFound
            | Self::RequestNotFound => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists
            | Self::ApplicationPendingExists
            | Self::ApplicationAlreadyDecided
            | Self::InvalidTransition => StatusCode::CONFLICT,
            Self::AgentInactive
            | Self::InvalidKind
            | Self::InvalidPrice
            | Self::InvalidStatus
            | Self::InvalidRole
            | Self::InvalidCoordinates
            | Self::CannotChangeOwnRole
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
