//! Person entity: a legal entity, entrepreneur or individual holding patents.

use chrono::NaiveDate;

use super::patent::PatentKey;

/// Legal kind of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonKind {
    LegalEntity = 1,
    IndividualEntrepreneur = 2,
    Individual = 3,
}

impl PersonKind {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::LegalEntity),
            2 => Some(Self::IndividualEntrepreneur),
            3 => Some(Self::Individual),
            _ => None,
        }
    }
}

/// A person as stored in the `person` table, keyed by tax number.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Person {
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
    /// Cluster membership: 1 = member, 0 = not.
    pub uk: i16,
    pub support_type: Option<String>,
}

impl Person {
    pub fn is_cluster_member(&self) -> bool {
        self.uk == 1
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: PersonPatch) {
        if let Some(v) = patch.tax_number {
            self.tax_number = v;
        }
        if let Some(v) = patch.kind {
            self.kind = v;
        }
        if let Some(v) = patch.active {
            self.active = v;
        }
        if let Some(v) = patch.ogrn {
            self.ogrn = v;
        }
        if let Some(v) = patch.uk {
            self.uk = v;
        }
        if let Some(v) = patch.full_name {
            self.full_name = v;
        }
        if let Some(v) = patch.short_name {
            self.short_name = v;
        }
        if let Some(v) = patch.legal_address {
            self.legal_address = v;
        }
        if let Some(v) = patch.fact_address {
            self.fact_address = v;
        }
        if let Some(v) = patch.reg_date {
            self.reg_date = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.okopf {
            self.okopf = v;
        }
        if let Some(v) = patch.okvad {
            self.okvad = v;
        }
        if let Some(v) = patch.region {
            self.region = v;
        }
        if let Some(v) = patch.support_type {
            self.support_type = v;
        }
    }
}

/// Input data for creating a person.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPerson {
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

/// Partial update for an existing person. Same conventions as
/// [`super::PatentPatch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonPatch {
    pub tax_number: Option<String>,
    pub kind: Option<i32>,
    pub full_name: Option<Option<String>>,
    pub short_name: Option<Option<String>>,
    pub legal_address: Option<Option<String>>,
    pub fact_address: Option<Option<String>>,
    pub reg_date: Option<Option<NaiveDate>>,
    pub active: Option<bool>,
    pub category: Option<Option<String>>,
    pub okopf: Option<Option<String>>,
    pub okvad: Option<Option<String>>,
    pub ogrn: Option<String>,
    pub region: Option<Option<String>>,
    pub uk: Option<i16>,
    pub support_type: Option<Option<String>>,
}

/// A person together with the patents they hold.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonWithPatents {
    pub person: Person,
    pub patents: Vec<PatentKey>,
}

impl PersonWithPatents {
    pub fn patent_count(&self) -> usize {
        self.patents.len()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn person(tax_number: &str) -> Person {
        Person {
            tax_number: tax_number.to_string(),
            kind: 1,
            full_name: Some("Общество с ограниченной ответственностью Ромашка".to_string()),
            short_name: Some("ООО Ромашка".to_string()),
            legal_address: Some("г. Москва, ул. Ленина, 1".to_string()),
            fact_address: None,
            reg_date: NaiveDate::from_ymd_opt(2010, 5, 20),
            active: true,
            category: Some("Малое предприятие".to_string()),
            okopf: Some("12300".to_string()),
            okvad: Some("72.19".to_string()),
            ogrn: "1027700132195".to_string(),
            region: Some("г. Москва".to_string()),
            uk: 1,
            support_type: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::person;
    use super::*;

    #[test]
    fn test_person_kind_codes() {
        assert_eq!(PersonKind::from_code(2), Some(PersonKind::IndividualEntrepreneur));
        assert_eq!(PersonKind::from_code(0), None);
    }

    #[test]
    fn test_apply_patch() {
        let mut p = person("7701234567");
        p.apply(PersonPatch {
            active: Some(false),
            support_type: Some(Some("Грант".to_string())),
            short_name: Some(None),
            ..Default::default()
        });

        assert!(!p.active);
        assert_eq!(p.support_type.as_deref(), Some("Грант"));
        assert!(p.short_name.is_none());
        assert_eq!(p.ogrn, "1027700132195");
    }

    #[test]
    fn test_cluster_member() {
        let mut p = person("7701234567");
        assert!(p.is_cluster_member());
        p.uk = 0;
        assert!(!p.is_cluster_member());
    }

    #[test]
    fn test_patent_count() {
        let full = PersonWithPatents {
            person: person("7701234567"),
            patents: vec![PatentKey::new(1, 1), PatentKey::new(2, 5)],
        };
        assert_eq!(full.patent_count(), 2);
    }
}
