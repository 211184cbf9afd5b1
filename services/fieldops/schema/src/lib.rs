//! SeaORM entities owned by the fieldops service.

pub mod agent_applications;
pub mod agents;
pub mod service_requests;
pub mod users;
