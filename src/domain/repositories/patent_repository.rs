//! Repository trait for patents.

use crate::domain::entities::{
    NewPatent, Patent, PatentCounts, PatentHolder, PatentKey, PatentQuery,
};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the `patent` table.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgPatentRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_patent.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatentRepository: Send + Sync {
    /// Inserts a patent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `(kind, reg_number)` is taken.
    async fn create(&self, new_patent: NewPatent) -> Result<Patent, AppError>;

    async fn find(&self, key: PatentKey) -> Result<Option<Patent>, AppError>;

    /// Lists patents matching `query` ordered by `actual DESC, kind, reg_number`.
    ///
    /// `limit = None` returns every matching row.
    async fn list(
        &self,
        query: &PatentQuery,
        offset: i64,
        limit: Option<i64>,
    ) -> Result<Vec<Patent>, AppError>;

    async fn count(&self, query: &PatentQuery) -> Result<i64, AppError>;

    /// Loads the holders of all given patents in one round trip.
    async fn holders(&self, keys: &[PatentKey]) -> Result<Vec<PatentHolder>, AppError>;

    /// Replaces the stored row at `key` with `patent`, which may carry a new key.
    ///
    /// Returns `None` if no patent exists at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new key collides with another patent.
    async fn update(&self, key: PatentKey, patent: Patent) -> Result<Option<Patent>, AppError>;

    /// Deletes a patent. Returns `false` if it did not exist.
    async fn delete(&self, key: PatentKey) -> Result<bool, AppError>;

    /// Inserts or updates every patent by `(kind, reg_number)` in a single
    /// transaction. Returns the number of rows written.
    async fn upsert_many(&self, patents: Vec<NewPatent>) -> Result<u64, AppError>;

    /// Aggregate counters, optionally restricted to patents owned by a
    /// tax number in the given filter.
    async fn counts(&self, filter_id: Option<i32>) -> Result<PatentCounts, AppError>;

    /// Round-trips a trivial query; used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}
