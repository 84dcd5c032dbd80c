//! Repository trait for persons.

use crate::domain::entities::{
    NewPerson, PatentBreakdown, PatentKey, Person, PersonCounts,
};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the `person` table and person-centric statistics.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgPersonRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the tax number or OGRN is taken.
    async fn create(&self, new_person: NewPerson) -> Result<Person, AppError>;

    async fn find(&self, tax_number: &str) -> Result<Option<Person>, AppError>;

    /// Keys of every patent the person holds, ordered by kind and number.
    async fn patents_of(&self, tax_number: &str) -> Result<Vec<PatentKey>, AppError>;

    /// Replaces the stored row at `tax_number`. Returns `None` if absent.
    async fn update(&self, tax_number: &str, person: Person) -> Result<Option<Person>, AppError>;

    /// Returns `false` if the person did not exist.
    async fn delete(&self, tax_number: &str) -> Result<bool, AppError>;

    /// Patents owned, grouped by OKOPF, OKVED and MPK class.
    async fn patent_breakdown(&self) -> Result<PatentBreakdown, AppError>;

    /// Counters over all persons, optionally restricted to a filter.
    async fn counts(&self, filter_id: Option<i32>) -> Result<PersonCounts, AppError>;

    /// Counters over persons registered in Moscow.
    async fn moscow_counts(&self, filter_id: Option<i32>) -> Result<PersonCounts, AppError>;
}
