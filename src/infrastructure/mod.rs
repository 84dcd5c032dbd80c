//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and caching.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (Redis and no-op implementations)
//! - [`database`] - Pool bootstrap with readiness retry and migrations
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod database;
pub mod persistence;
