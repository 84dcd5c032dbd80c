//! # Patent Registry
//!
//! Backend of a registry of patents, their rights holders ("persons") and the
//! ownership links between them, with cached aggregate statistics, CSV
//! import/export and tax-number filters. Built with Axum, PostgreSQL and Redis.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Core entities, repository traits, export worker
//! - **Application Layer** ([`application`]) - Business logic, caching, validation
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL, Redis, startup retry
//! - **API Layer** ([`api`]) - REST handlers, DTOs, extractors and middleware
//!
//! ## Deployment
//!
//! `docker-compose.yml` runs the backend next to `postgres:16.4` and
//! `redis:alpine`. Compose only orders container start, so the backend
//! retries its first database connection (see [`infrastructure::database`]).
//!
//! ```bash
//! cp .env.example .env
//! docker compose up --build
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        ExportService, FilterService, OwnershipService, PatentService, PersonService,
    };
    pub use crate::domain::entities::{
        NewOwnership, NewPatent, NewPerson, Patent, PatentKey, PatentQuery, Person,
    };
    pub use crate::error::AppError;
    pub use crate::state::{AppState, Repositories, StateOptions};
}
