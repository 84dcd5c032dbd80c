//! Arithmetic shared by the statistics endpoints.

use crate::domain::entities::CategoryCount;
use crate::domain::entities::stats::{NamedCount, OTHERS, UNSPECIFIED};
use std::collections::BTreeMap;

/// Number of named entries kept by [`top_with_others`].
pub const TOP_N: usize = 5;

/// Integer percentage of `part` in `whole`, rounded half away from zero.
/// Returns 0 when `whole` is 0.
pub fn percent_rounded(part: i64, whole: i64) -> i64 {
    if whole == 0 {
        return 0;
    }
    (part as f64 * 100.0 / whole as f64).round() as i64
}

/// Percentage of `part` in `whole` rounded to two decimals. Returns 0 when
/// `whole` is 0.
pub fn percent_2dp(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 10_000.0 / whole as f64).round() / 100.0
}

/// Keeps the first [`TOP_N`] rows and folds the rest into an `"Остальные"`
/// entry, which is omitted when it would be zero.
///
/// `rows` must already be ordered by count, descending.
pub fn top_with_others(rows: Vec<NamedCount>) -> Vec<CategoryCount> {
    let others: i64 = rows.iter().skip(TOP_N).map(|(_, count)| count).sum();

    let mut out: Vec<CategoryCount> = rows
        .into_iter()
        .take(TOP_N)
        .map(|(name, count)| CategoryCount {
            name: name.unwrap_or_else(|| UNSPECIFIED.to_string()),
            count,
        })
        .collect();

    if others > 0 {
        out.push(CategoryCount {
            name: OTHERS.to_string(),
            count: others,
        });
    }

    out
}

/// Collects `(name, count)` rows into a map, naming nulls `"Не указано"`.
pub fn named_map(rows: Vec<NamedCount>) -> BTreeMap<String, i64> {
    let mut map = BTreeMap::new();
    for (name, count) in rows {
        *map.entry(name.unwrap_or_else(|| UNSPECIFIED.to_string()))
            .or_insert(0) += count;
    }
    map
}
