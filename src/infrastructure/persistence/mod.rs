//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow`.
//!
//! # Repositories
//!
//! - [`PgPatentRepository`] - Patents, holders and patent statistics
//! - [`PgPersonRepository`] - Persons and person statistics
//! - [`PgOwnershipRepository`] - Person/patent links
//! - [`PgFilterRepository`] - Tax-number filters

pub mod pg_filter_repository;
pub mod pg_ownership_repository;
pub mod pg_patent_repository;
pub mod pg_person_repository;

pub use pg_filter_repository::PgFilterRepository;
pub use pg_ownership_repository::PgOwnershipRepository;
pub use pg_patent_repository::PgPatentRepository;
pub use pg_person_repository::PgPersonRepository;
