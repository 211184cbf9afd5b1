use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use frostline_core::health::{healthz, readyz};
use frostline_core::middleware::request_id_layer;

use crate::handlers::{
    agent::{get_my_agent, list_agents, set_agent_active},
    application::{apply, approve_application, list_applications, reject_application},
    request::{
        assign_request, cancel_request, complete_request, create_request, get_request,
        list_assigned_requests, list_my_requests, list_requests, reject_request, start_request,
    },
    user::{get_me, grant_role, list_users, register_user, revoke_role, update_me},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/users", post(register_user))
        .route("/users", get(list_users))
        .route("/users/@me", get(get_me))
        .route("/users/@me", patch(update_me))
        .route("/users/{id}/role", put(grant_role))
        .route("/users/{id}/role", delete(revoke_role))
        // Agents
        .route("/agents", get(list_agents))
        .route("/agents/@me", get(get_my_agent))
        .route("/agents/{id}/active", patch(set_agent_active))
        // Agent applications
        .route("/agents/applications", post(apply))
        .route("/agents/applications", get(list_applications))
        .route("/agents/applications/{id}/approve", post(approve_application))
        .route("/agents/applications/{id}/reject", post(reject_application))
        // Service requests
        .route("/service-requests", post(create_request))
        .route("/service-requests", get(list_requests))
        .route("/service-requests/@me", get(list_my_requests))
        .route("/service-requests/assigned", get(list_assigned_requests))
        .route("/service-requests/{id}", get(get_request))
        .route("/service-requests/{id}/assign", post(assign_request))
        .route("/service-requests/{id}/start", post(start_request))
        .route("/service-requests/{id}/complete", post(complete_request))
        .route("/service-requests/{id}/cancel", post(cancel_request))
        .route("/service-requests/{id}/reject", post(reject_request))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}
