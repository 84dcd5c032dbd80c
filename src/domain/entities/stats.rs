//! Aggregated statistics, both the raw counts read from storage and the
//! computed payloads served (and cached) by the API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label used for rows whose grouping column is null.
pub const UNSPECIFIED: &str = "Не указано";

/// Label of the bucket that sums everything outside the top entries.
pub const OTHERS: &str = "Остальные";

/// Raw patent counters as returned by the repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatentCounts {
    pub total: i64,
    pub total_ru: i64,
    pub with_holders: i64,
    pub ru_with_holders: i64,
    /// `(group label, count)`, groups `"0"`, `"1"`, `"2–5"`, `"5+"`.
    pub by_author_count: Vec<(String, i64)>,
    pub by_kind: Vec<(i32, i64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentsStats {
    pub total_patents: i64,
    pub total_ru_patents: i64,
    pub total_with_holders: i64,
    pub total_ru_with_holders: i64,
    pub with_holders_percent: i64,
    pub ru_with_holders_percent: i64,
    pub by_author_count: BTreeMap<String, i64>,
    pub by_patent_kind: BTreeMap<i32, i64>,
}

/// One `(name, number of patents)` row of a breakdown, name possibly null.
pub type NamedCount = (Option<String>, i64);

/// Raw breakdown rows, each ordered by count descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatentBreakdown {
    pub okopf: Vec<NamedCount>,
    pub okvad: Vec<NamedCount>,
    pub mpk: Vec<NamedCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonsBreakdown {
    pub okopf_stats: Vec<CategoryCount>,
    pub okvad_stats: Vec<CategoryCount>,
    pub mpk_stats: Vec<CategoryCount>,
}

/// Raw person counters as returned by the repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonCounts {
    pub total: i64,
    pub cluster_members: i64,
    pub with_support_type: i64,
    pub by_kind: Vec<(i32, i64)>,
    pub by_category: Vec<NamedCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonsStats {
    pub total_persons: i64,
    pub by_kind: BTreeMap<i32, i64>,
    pub by_category: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoscowPersonsStats {
    pub total_persons: i64,
    pub by_kind: BTreeMap<i32, i64>,
    pub by_category: BTreeMap<String, i64>,
    pub moscow_cluster_percentage: f64,
    pub moscow_support_type_percentage: f64,
}
