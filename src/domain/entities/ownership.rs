//! Ownership link between a person and a patent.

use super::patent::PatentKey;

/// A stored `person ⟷ patent` link.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Ownership {
    pub id: i64,
    pub person_tax_number: String,
    pub patent_kind: i32,
    pub patent_reg_number: i32,
}

impl Ownership {
    pub fn patent_key(&self) -> PatentKey {
        PatentKey::new(self.patent_kind, self.patent_reg_number)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOwnership {
    pub person_tax_number: String,
    pub patent_kind: i32,
    pub patent_reg_number: i32,
}

/// Listing criteria; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnershipQuery {
    pub person_tax_number: Option<String>,
    pub patent_kind: Option<i32>,
    pub patent_reg_number: Option<i32>,
}
