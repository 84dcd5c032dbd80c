//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation, statistics caching and
//! cache invalidation, and expose a clean API to the HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::patent_service::PatentService`] - Patents, import and patent statistics
//! - [`services::person_service::PersonService`] - Persons and person statistics
//! - [`services::ownership_service::OwnershipService`] - Person/patent links
//! - [`services::filter_service::FilterService`] - Tax-number filters
//! - [`services::export_service::ExportService`] - Queued CSV exports

pub mod services;
