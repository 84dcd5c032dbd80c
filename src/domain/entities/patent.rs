//! Patent entity and its creation/update inputs.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

/// Legal kind of a patent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatentKind {
    Invention = 1,
    UtilityModel = 2,
    IndustrialDesign = 3,
}

impl PatentKind {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Invention),
            2 => Some(Self::UtilityModel),
            3 => Some(Self::IndustrialDesign),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    /// Human-readable label used in exports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Invention => "Изобретение",
            Self::UtilityModel => "Полезная модель",
            Self::IndustrialDesign => "Промышленный образец",
        }
    }
}

/// Natural key of a patent: registration numbers are unique per kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatentKey {
    pub kind: i32,
    pub reg_number: i32,
}

impl PatentKey {
    pub fn new(kind: i32, reg_number: i32) -> Self {
        Self { kind, reg_number }
    }
}

impl fmt::Display for PatentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.reg_number)
    }
}

/// A registered patent as stored in the `patent` table.
///
/// `author_count` is computed by the database from `author_raw`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Patent {
    pub kind: i32,
    pub reg_number: i32,
    pub reg_date: Option<NaiveDate>,
    pub appl_date: Option<NaiveDate>,
    pub author_raw: Option<String>,
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
    pub author_count: i32,
}

impl Patent {
    pub fn key(&self) -> PatentKey {
        PatentKey::new(self.kind, self.reg_number)
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: PatentPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(reg_number) = patch.reg_number {
            self.reg_number = reg_number;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(actual) = patch.actual {
            self.actual = actual;
        }
        if let Some(date) = patch.patent_starting_date {
            self.patent_starting_date = date;
        }
        if let Some(v) = patch.reg_date {
            self.reg_date = v;
        }
        if let Some(v) = patch.appl_date {
            self.appl_date = v;
        }
        if let Some(v) = patch.author_raw {
            self.author_raw = v;
        }
        if let Some(v) = patch.owner_raw {
            self.owner_raw = v;
        }
        if let Some(v) = patch.address {
            self.address = v;
        }
        if let Some(v) = patch.subcategory {
            self.subcategory = v;
        }
        if let Some(v) = patch.country_code {
            self.country_code = v;
        }
        if let Some(v) = patch.region {
            self.region = v;
        }
        if let Some(v) = patch.city {
            self.city = v;
        }
        if let Some(v) = patch.appl_number {
            self.appl_number = v;
        }
        if let Some(v) = patch.publication_url {
            self.publication_url = v;
        }
    }
}

/// Input data for creating (or importing) a patent.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatent {
    pub kind: i32,
    pub reg_number: i32,
    pub reg_date: Option<NaiveDate>,
    pub appl_date: Option<NaiveDate>,
    pub author_raw: Option<String>,
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
}

impl NewPatent {
    pub fn key(&self) -> PatentKey {
        PatentKey::new(self.kind, self.reg_number)
    }
}

/// Partial update for an existing patent.
///
/// `None` leaves a field unchanged. For nullable columns `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatentPatch {
    pub kind: Option<i32>,
    pub reg_number: Option<i32>,
    pub reg_date: Option<Option<NaiveDate>>,
    pub appl_date: Option<Option<NaiveDate>>,
    pub author_raw: Option<Option<String>>,
    pub owner_raw: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub name: Option<String>,
    pub actual: Option<bool>,
    pub subcategory: Option<Option<String>>,
    pub country_code: Option<Option<String>>,
    pub region: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub appl_number: Option<Option<String>>,
    pub patent_starting_date: Option<NaiveDate>,
    pub publication_url: Option<Option<String>>,
}

/// A person holding rights to a patent.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PatentHolder {
    pub patent_kind: i32,
    pub patent_reg_number: i32,
    pub tax_number: String,
    pub full_name: Option<String>,
    pub short_name: Option<String>,
}

impl PatentHolder {
    pub fn patent_key(&self) -> PatentKey {
        PatentKey::new(self.patent_kind, self.patent_reg_number)
    }
}

/// A patent together with its rights holders.
#[derive(Debug, Clone, PartialEq)]
pub struct PatentWithHolders {
    pub patent: Patent,
    pub holders: Vec<PatentHolder>,
}

impl PatentWithHolders {
    /// Attaches holders to each patent, keeping the patents' order.
    pub fn attach(patents: Vec<Patent>, holders: Vec<PatentHolder>) -> Vec<Self> {
        let mut by_key: HashMap<PatentKey, Vec<PatentHolder>> = HashMap::new();
        for holder in holders {
            by_key.entry(holder.patent_key()).or_default().push(holder);
        }

        patents
            .into_iter()
            .map(|patent| {
                let holders = by_key.remove(&patent.key()).unwrap_or_default();
                Self { patent, holders }
            })
            .collect()
    }

    /// Holders' short names joined with `", "`, or the stored `owner_raw`
    /// when no holder has a short name.
    pub fn owner_names(&self) -> Option<String> {
        let names: Vec<&str> = self
            .holders
            .iter()
            .filter_map(|h| h.short_name.as_deref())
            .collect();

        if names.is_empty() {
            self.patent.owner_raw.clone()
        } else {
            Some(names.join(", "))
        }
    }
}

/// Selection criteria shared by listing, counting and export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatentQuery {
    pub kind: Option<i32>,
    pub actual: Option<bool>,
    pub filter_id: Option<i32>,
}

impl PatentQuery {
    pub fn is_unfiltered(&self) -> bool {
        self.kind.is_none() && self.actual.is_none() && self.filter_id.is_none()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_kind_codes() {
        assert_eq!(PatentKind::from_code(1), Some(PatentKind::Invention));
        assert_eq!(PatentKind::from_code(3), Some(PatentKind::IndustrialDesign));
        assert_eq!(PatentKind::from_code(4), None);
        assert_eq!(PatentKind::UtilityModel.code(), 2);
        assert_eq!(PatentKind::UtilityModel.label(), "Полезная модель");
    }

    #[test]
    fn test_apply_patch_sets_and_clears() {
        let mut p = patent(1, 100);
        p.apply(PatentPatch {
            name: Some("Новое название".to_string()),
            actual: Some(false),
            region: Some(None),
            city: Some(Some("Казань".to_string())),
            ..Default::default()
        });

        assert_eq!(p.name, "Новое название");
        assert!(!p.actual);
        assert!(p.region.is_none());
        assert_eq!(p.city.as_deref(), Some("Казань"));
        // untouched
        assert_eq!(p.subcategory.as_deref(), Some("G06F"));
        assert_eq!(p.key(), PatentKey::new(1, 100));
    }

    #[test]
    fn test_apply_patch_can_rekey() {
        let mut p = patent(1, 100);
        p.apply(PatentPatch {
            kind: Some(2),
            reg_number: Some(200),
            ..Default::default()
        });
        assert_eq!(p.key(), PatentKey::new(2, 200));
    }

    #[test]
    fn test_owner_names_joins_short_names() {
        let p = patent(1, 7);
        let key = p.key();
        let full = PatentWithHolders {
            patent: p,
            holders: vec![
                holder(key, "7701234567", Some("ООО Альфа")),
                holder(key, "7707654321", None),
                holder(key, "7709999999", Some("АО Бета")),
            ],
        };
        assert_eq!(full.owner_names().as_deref(), Some("ООО Альфа, АО Бета"));
    }

    #[test]
    fn test_owner_names_falls_back_to_stored() {
        let full = PatentWithHolders {
            patent: patent(1, 7),
            holders: vec![],
        };
        assert_eq!(full.owner_names().as_deref(), Some("ООО Ромашка"));
    }

    #[test]
    fn test_attach_keeps_patent_order() {
        let a = patent(1, 1);
        let b = patent(2, 1);
        let holders = vec![
            holder(b.key(), "7701234567", Some("Б")),
            holder(a.key(), "7707654321", Some("А")),
            holder(b.key(), "7709999999", Some("В")),
        ];

        let out = PatentWithHolders::attach(vec![a.clone(), b.clone()], holders);
        assert_eq!(out[0].patent.key(), a.key());
        assert_eq!(out[0].holders.len(), 1);
        assert_eq!(out[1].holders.len(), 2);
    }

    #[test]
    fn test_query_unfiltered() {
        assert!(PatentQuery::default().is_unfiltered());
        assert!(
            !PatentQuery {
                kind: Some(1),
                ..Default::default()
            }
            .is_unfiltered()
        );
    }

    #[test]
    fn test_key_display() {
        assert_eq!(PatentKey::new(2, 12345).to_string(), "2/12345");
    }
}
