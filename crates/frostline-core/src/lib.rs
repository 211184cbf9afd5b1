//! Ambient plumbing shared by Frostline services: health endpoints,
//! request-id middleware, tracing setup, serde helpers, and SeaORM query
//! extensions.

pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
