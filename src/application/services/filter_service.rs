//! Tax-number filter management.

use crate::domain::entities::{FilterSummary, NewFilter, TaxNumberFilter};
use crate::domain::repositories::FilterRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, invalidate_stats};
use crate::utils::validation::is_tax_number;
use serde_json::json;
use std::sync::Arc;

/// Service for the uploaded tax-number lists that scope listings and statistics.
pub struct FilterService {
    filters: Arc<dyn FilterRepository>,
    cache: Arc<dyn CacheService>,
}

impl FilterService {
    pub fn new(filters: Arc<dyn FilterRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self { filters, cache }
    }

    /// Stores a filter built from raw entries.
    ///
    /// Entries are trimmed and de-duplicated first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unprocessable`] if no entry remains or any entry
    /// is not a 10 or 12 digit tax number.
    pub async fn create<I, S>(
        &self,
        name: Option<String>,
        entries: I,
    ) -> Result<TaxNumberFilter, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let new_filter = NewFilter::from_raw(name, entries);

        if new_filter.tax_numbers.is_empty() {
            return Err(AppError::unprocessable(
                "Filter must contain at least one tax number",
                json!({ "field": "tax_numbers" }),
            ));
        }

        let invalid: Vec<&String> = new_filter
            .tax_numbers
            .iter()
            .filter(|t| !is_tax_number(t))
            .collect();
        if !invalid.is_empty() {
            return Err(AppError::unprocessable(
                "Tax numbers must have 10 or 12 digits",
                json!({ "invalid": invalid }),
            ));
        }

        let filter = self.filters.create(new_filter).await?;
        invalidate_stats(self.cache.as_ref()).await;

        tracing::info!(id = filter.id, size = filter.tax_numbers.len(), "filter created");
        Ok(filter)
    }

    pub async fn get(&self, id: i32) -> Result<TaxNumberFilter, AppError> {
        self.filters
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found("Filter not found", json!({ "filter_id": id })))
    }

    pub async fn list(&self) -> Result<Vec<FilterSummary>, AppError> {
        self.filters.list().await
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.filters.delete(id).await? {
            return Err(AppError::not_found(
                "Filter not found",
                json!({ "filter_id": id }),
            ));
        }
        invalidate_stats(self.cache.as_ref()).await;
        Ok(())
    }
}
