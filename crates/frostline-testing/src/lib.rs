//! Test utilities for Frostline services.
//!
//! Provides gateway-identity header mocks. Import in `#[cfg(test)]` blocks
//! and `tests/` directories only — never in production code.

pub mod auth;
