//! Database connectors shared across services.
//!
//! Currently provides a MongoDB connector with env-driven configuration and
//! health checks.

pub mod mongodb;
