//! Repository trait definitions for the domain layer.
//!
//! Traits define the data-access contract; PostgreSQL implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod filter_repository;
pub mod ownership_repository;
pub mod patent_repository;
pub mod person_repository;

pub use filter_repository::FilterRepository;
pub use ownership_repository::OwnershipRepository;
pub use patent_repository::PatentRepository;
pub use person_repository::PersonRepository;

#[cfg(test)]
pub use filter_repository::MockFilterRepository;
#[cfg(test)]
pub use ownership_repository::MockOwnershipRepository;
#[cfg(test)]
pub use patent_repository::MockPatentRepository;
#[cfg(test)]
pub use person_repository::MockPersonRepository;
