//! Pagination and selection query parameters.

use serde::Deserialize;
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::PatentQuery;
use crate::error::AppError;
use crate::utils::flag;

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 1000;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse numbers from query strings, which is required
/// once the struct is flattened into another.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub pagesize: Option<u32>,
}

impl PaginationParams {
    /// Validates pagination parameters and converts to database offset/limit.
    ///
    /// Defaults: `page` 1, `pagesize` 10. `page` must be at least 1 and
    /// `pagesize` between 1 and 1000.
    pub fn offset_limit(&self) -> Result<(i64, i64), AppError> {
        let page = self.page.unwrap_or(1);
        let pagesize = self.pagesize.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": page }),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&pagesize) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "pagesize": pagesize }),
            ));
        }

        let offset = (page as i64 - 1) * pagesize as i64;
        Ok((offset, pagesize as i64))
    }
}

/// Optional `filter_id` scoping statistics endpoints.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub filter_id: Option<i32>,
}

/// Patent selection shared by listing and export.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PatentSelectionParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub filter_id: Option<i32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub kind: Option<i32>,

    #[serde(default, with = "flag::optional")]
    pub actual: Option<bool>,
}

impl From<PatentSelectionParams> for PatentQuery {
    fn from(p: PatentSelectionParams) -> Self {
        PatentQuery {
            kind: p.kind,
            actual: p.actual,
            filter_id: p.filter_id,
        }
    }
}

/// Query string of `GET /patents`.
#[derive(Debug, Deserialize)]
pub struct PatentListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    #[serde(flatten)]
    pub selection: PatentSelectionParams,
}
