//! Repository trait for tax-number filters.

use crate::domain::entities::{FilterSummary, NewFilter, TaxNumberFilter};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilterRepository: Send + Sync {
    /// Stores the filter header and its tax numbers in one transaction.
    async fn create(&self, new_filter: NewFilter) -> Result<TaxNumberFilter, AppError>;

    async fn find(&self, id: i32) -> Result<Option<TaxNumberFilter>, AppError>;

    async fn exists(&self, id: i32) -> Result<bool, AppError>;

    async fn list(&self) -> Result<Vec<FilterSummary>, AppError>;

    /// Returns `false` if no filter had this id.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}
