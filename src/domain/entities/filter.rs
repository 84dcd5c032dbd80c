//! Tax-number filters: named lists of tax numbers that scope statistics.

use chrono::{DateTime, Utc};

/// Filter header row with the number of tax numbers it holds.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct FilterSummary {
    pub id: i32,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub size: i64,
}

/// A filter with its full tax-number list.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxNumberFilter {
    pub id: i32,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub tax_numbers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFilter {
    pub name: Option<String>,
    pub tax_numbers: Vec<String>,
}

impl NewFilter {
    /// Builds a filter from raw entries: trims them, drops blanks and
    /// duplicates while keeping first-seen order.
    pub fn from_raw<I, S>(name: Option<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tax_numbers: Vec<String> = Vec::new();
        for entry in entries {
            let value = entry.as_ref().trim();
            if value.is_empty() || tax_numbers.iter().any(|t| t == value) {
                continue;
            }
            tax_numbers.push(value.to_string());
        }

        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Self { name, tax_numbers }
    }
}
