//! DTOs for the persons endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{NewPerson, PatentKey, Person, PersonPatch, PersonWithPatents};
use crate::utils::flag;
use crate::utils::validation::{OGRN_RE, TAX_NUMBER_RE};

fn default_active() -> bool {
    true
}

/// Request body for `POST /persons`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePersonRequest {
    #[validate(regex(path = "*TAX_NUMBER_RE", message = "Tax number must have 10 or 12 digits"))]
    pub tax_number: String,

    #[validate(range(min = 1, max = 3, message = "Person kind must be 1, 2 or 3"))]
    pub kind: i32,

    pub full_name: Option<String>,
    pub short_name: Option<String>,
    pub legal_address: Option<String>,
    pub fact_address: Option<String>,
    pub reg_date: Option<NaiveDate>,

    #[serde(default = "default_active", deserialize_with = "flag::deserialize")]
    pub active: bool,

    pub category: Option<String>,
    pub okopf: Option<String>,
    pub okvad: Option<String>,

    #[validate(regex(path = "*OGRN_RE", message = "OGRN must have 13 or 15 digits"))]
    pub ogrn: String,

    pub region: Option<String>,

    #[validate(range(min = 0, max = 1, message = "uk must be 0 or 1"))]
    pub uk: i16,

    pub support_type: Option<String>,
}

impl From<CreatePersonRequest> for NewPerson {
    fn from(r: CreatePersonRequest) -> Self {
        NewPerson {
            tax_number: r.tax_number,
            kind: r.kind,
            full_name: r.full_name,
            short_name: r.short_name,
            legal_address: r.legal_address,
            fact_address: r.fact_address,
            reg_date: r.reg_date,
            active: r.active,
            category: r.category,
            okopf: r.okopf,
            okvad: r.okvad,
            ogrn: r.ogrn,
            region: r.region,
            uk: r.uk,
            support_type: r.support_type,
        }
    }
}

/// Request body for `PATCH /persons/{tax_number}`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePersonRequest {
    #[validate(regex(path = "*TAX_NUMBER_RE", message = "Tax number must have 10 or 12 digits"))]
    pub tax_number: Option<String>,

    #[validate(range(min = 1, max = 3, message = "Person kind must be 1, 2 or 3"))]
    pub kind: Option<i32>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub full_name: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub short_name: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub legal_address: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub fact_address: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub reg_date: Option<Option<NaiveDate>>,

    #[serde(default, with = "flag::optional")]
    pub active: Option<bool>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub category: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub okopf: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub okvad: Option<Option<String>>,

    #[validate(regex(path = "*OGRN_RE", message = "OGRN must have 13 or 15 digits"))]
    pub ogrn: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub region: Option<Option<String>>,

    #[validate(range(min = 0, max = 1, message = "uk must be 0 or 1"))]
    pub uk: Option<i16>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub support_type: Option<Option<String>>,
}

impl From<UpdatePersonRequest> for PersonPatch {
    fn from(r: UpdatePersonRequest) -> Self {
        PersonPatch {
            tax_number: r.tax_number,
            kind: r.kind,
            full_name: r.full_name,
            short_name: r.short_name,
            legal_address: r.legal_address,
            fact_address: r.fact_address,
            reg_date: r.reg_date,
            active: r.active,
            category: r.category,
            okopf: r.okopf,
            okvad: r.okvad,
            ogrn: r.ogrn,
            region: r.region,
            uk: r.uk,
            support_type: r.support_type,
        }
    }
}

/// JSON representation of a person.
#[derive(Debug, Serialize)]
pub struct PersonResponse {
    pub tax_number: String,
    pub kind: i32,
    pub full_name: Option<String>,
    pub short_name: Option<String>,
    pub legal_address: Option<String>,
    pub fact_address: Option<String>,
    pub reg_date: Option<NaiveDate>,
    pub active: bool,
    pub category: Option<String>,
    pub okopf: Option<String>,
    pub okvad: Option<String>,
    pub ogrn: String,
    pub region: Option<String>,
    pub uk: i16,
    pub support_type: Option<String>,
}

impl From<Person> for PersonResponse {
    fn from(p: Person) -> Self {
        Self {
            tax_number: p.tax_number,
            kind: p.kind,
            full_name: p.full_name,
            short_name: p.short_name,
            legal_address: p.legal_address,
            fact_address: p.fact_address,
            reg_date: p.reg_date,
            active: p.active,
            category: p.category,
            okopf: p.okopf,
            okvad: p.okvad,
            ogrn: p.ogrn,
            region: p.region,
            uk: p.uk,
            support_type: p.support_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PatentKeyResponse {
    pub kind: i32,
    pub reg_number: i32,
}

impl From<PatentKey> for PatentKeyResponse {
    fn from(k: PatentKey) -> Self {
        Self {
            kind: k.kind,
            reg_number: k.reg_number,
        }
    }
}

/// Response of `GET /persons/{tax_number}`.
#[derive(Debug, Serialize)]
pub struct PersonDetailResponse {
    #[serde(flatten)]
    pub person: PersonResponse,
    pub patents: Vec<PatentKeyResponse>,
    pub patent_count: usize,
}

impl From<PersonWithPatents> for PersonDetailResponse {
    fn from(full: PersonWithPatents) -> Self {
        let patent_count = full.patent_count();
        Self {
            person: full.person.into(),
            patents: full.patents.into_iter().map(Into::into).collect(),
            patent_count,
        }
    }
}
