//! DTOs for the patents endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use validator::Validate;

use crate::domain::entities::{
    NewPatent, Patent, PatentHolder, PatentKind, PatentPatch, PatentWithHolders,
};
use crate::utils::flag;

/// Request body for `POST /patents`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePatentRequest {
    #[validate(range(min = 1, max = 3, message = "Patent kind must be 1, 2 or 3"))]
    pub kind: i32,

    #[validate(range(min = 1))]
    pub reg_number: i32,

    pub reg_date: Option<NaiveDate>,
    pub appl_date: Option<NaiveDate>,
    pub author_raw: Option<String>,
    pub owner_raw: Option<String>,
    pub address: Option<String>,

    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    #[serde(default, deserialize_with = "flag::deserialize")]
    pub actual: bool,

    pub subcategory: Option<String>,

    #[validate(length(min = 2, max = 2))]
    pub country_code: Option<String>,

    pub region: Option<String>,
    pub city: Option<String>,
    pub appl_number: Option<String>,
    pub patent_starting_date: NaiveDate,

    #[validate(url(message = "Invalid URL format"))]
    pub publication_url: Option<String>,
}

impl From<CreatePatentRequest> for NewPatent {
    fn from(r: CreatePatentRequest) -> Self {
        NewPatent {
            kind: r.kind,
            reg_number: r.reg_number,
            reg_date: r.reg_date,
            appl_date: r.appl_date,
            author_raw: r.author_raw,
            owner_raw: r.owner_raw,
            address: r.address,
            name: r.name,
            actual: r.actual,
            subcategory: r.subcategory,
            country_code: r.country_code,
            region: r.region,
            city: r.city,
            appl_number: r.appl_number,
            patent_starting_date: r.patent_starting_date,
            publication_url: r.publication_url,
        }
    }
}

/// Request body for `PATCH /patents/{kind}/{reg_number}`.
///
/// Absent fields are left unchanged; `null` clears a nullable field.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePatentRequest {
    #[validate(range(min = 1, max = 3, message = "Patent kind must be 1, 2 or 3"))]
    pub kind: Option<i32>,

    #[validate(range(min = 1))]
    pub reg_number: Option<i32>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub reg_date: Option<Option<NaiveDate>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub appl_date: Option<Option<NaiveDate>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub author_raw: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub owner_raw: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub address: Option<Option<String>>,

    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,

    #[serde(default, with = "flag::optional")]
    pub actual: Option<bool>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub subcategory: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub country_code: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub region: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub city: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub appl_number: Option<Option<String>>,

    pub patent_starting_date: Option<NaiveDate>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub publication_url: Option<Option<String>>,
}

impl From<UpdatePatentRequest> for PatentPatch {
    fn from(r: UpdatePatentRequest) -> Self {
        PatentPatch {
            kind: r.kind,
            reg_number: r.reg_number,
            reg_date: r.reg_date,
            appl_date: r.appl_date,
            author_raw: r.author_raw,
            owner_raw: r.owner_raw,
            address: r.address,
            name: r.name,
            actual: r.actual,
            subcategory: r.subcategory,
            country_code: r.country_code,
            region: r.region,
            city: r.city,
            appl_number: r.appl_number,
            patent_starting_date: r.patent_starting_date,
            publication_url: r.publication_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PatentHolderResponse {
    pub tax_number: String,
    pub full_name: Option<String>,
}

impl From<PatentHolder> for PatentHolderResponse {
    fn from(h: PatentHolder) -> Self {
        Self {
            tax_number: h.tax_number,
            full_name: h.full_name,
        }
    }
}

/// JSON representation of a patent.
#[derive(Debug, Serialize)]
pub struct PatentResponse {
    pub kind: i32,
    pub kind_name: Option<&'static str>,
    pub reg_number: i32,
    pub reg_date: Option<NaiveDate>,
    pub appl_date: Option<NaiveDate>,
    pub author_raw: Option<String>,
    pub author_count: i32,
    pub owner_raw: Option<String>,
    pub address: Option<String>,
    pub name: String,
    pub actual: bool,
    pub subcategory: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub appl_number: Option<String>,
    pub patent_starting_date: NaiveDate,
    pub publication_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patent_holders: Option<Vec<PatentHolderResponse>>,
}

impl From<Patent> for PatentResponse {
    fn from(p: Patent) -> Self {
        Self {
            kind: p.kind,
            kind_name: PatentKind::from_code(p.kind).map(PatentKind::label),
            reg_number: p.reg_number,
            reg_date: p.reg_date,
            appl_date: p.appl_date,
            author_raw: p.author_raw,
            author_count: p.author_count,
            owner_raw: p.owner_raw,
            address: p.address,
            name: p.name,
            actual: p.actual,
            subcategory: p.subcategory,
            country_code: p.country_code,
            region: p.region,
            city: p.city,
            appl_number: p.appl_number,
            patent_starting_date: p.patent_starting_date,
            publication_url: p.publication_url,
            patent_holders: None,
        }
    }
}

impl From<PatentWithHolders> for PatentResponse {
    fn from(full: PatentWithHolders) -> Self {
        let mut response = PatentResponse::from(full.patent);
        response.patent_holders = Some(full.holders.into_iter().map(Into::into).collect());
        response
    }
}

/// Response of `GET /patents`.
#[derive(Debug, Serialize)]
pub struct PatentListResponse {
    pub total: i64,
    pub items: Vec<PatentResponse>,
}

/// Response of `POST /uploadfile`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: Option<String>,
    pub imported: u64,
}
