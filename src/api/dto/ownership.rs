//! DTOs for the ownerships endpoints.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::domain::entities::{NewOwnership, Ownership, OwnershipQuery};
use crate::utils::validation::TAX_NUMBER_RE;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOwnershipRequest {
    #[validate(regex(path = "*TAX_NUMBER_RE", message = "Tax number must have 10 or 12 digits"))]
    pub person_tax_number: String,

    #[validate(range(min = 1, max = 3, message = "Patent kind must be 1, 2 or 3"))]
    pub patent_kind: i32,

    #[validate(range(min = 1))]
    pub patent_reg_number: i32,
}

impl From<CreateOwnershipRequest> for NewOwnership {
    fn from(r: CreateOwnershipRequest) -> Self {
        NewOwnership {
            person_tax_number: r.person_tax_number,
            patent_kind: r.patent_kind,
            patent_reg_number: r.patent_reg_number,
        }
    }
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct OwnershipListParams {
    #[serde(default)]
    pub person_tax_number: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub patent_kind: Option<i32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub patent_reg_number: Option<i32>,
}

impl From<OwnershipListParams> for OwnershipQuery {
    fn from(p: OwnershipListParams) -> Self {
        OwnershipQuery {
            person_tax_number: p.person_tax_number,
            patent_kind: p.patent_kind,
            patent_reg_number: p.patent_reg_number,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OwnershipResponse {
    pub id: i64,
    pub person_tax_number: String,
    pub patent_kind: i32,
    pub patent_reg_number: i32,
}

impl From<Ownership> for OwnershipResponse {
    fn from(o: Ownership) -> Self {
        Self {
            id: o.id,
            person_tax_number: o.person_tax_number,
            patent_kind: o.patent_kind,
            patent_reg_number: o.patent_reg_number,
        }
    }
}
