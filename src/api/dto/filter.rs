//! DTOs for the tax-number filter endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{FilterSummary, TaxNumberFilter};

/// Request body for `POST /filters`. Entries are checked by the service.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFilterRequest {
    #[validate(length(max = 200))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "At least one tax number is required"))]
    pub tax_numbers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub id: i32,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub tax_numbers: Vec<String>,
}

impl From<TaxNumberFilter> for FilterResponse {
    fn from(f: TaxNumberFilter) -> Self {
        Self {
            id: f.id,
            name: f.name,
            created_at: f.created_at,
            tax_numbers: f.tax_numbers,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilterSummaryResponse {
    pub id: i32,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub size: i64,
}

impl From<FilterSummary> for FilterSummaryResponse {
    fn from(f: FilterSummary) -> Self {
        Self {
            id: f.id,
            name: f.name,
            created_at: f.created_at,
            size: f.size,
        }
    }
}
